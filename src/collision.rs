//! Collision detection and scoring.

use crate::entities::{Alien, AlienBullet, Bullet, Ship};

/// What killed the ship this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipHit {
    Alien,
    AlienBullet,
    /// An alien reached the bottom of the screen.
    Breach,
}

/// Remove every intersecting bullet/alien pair.  A bullet consumes at most
/// one alien and an alien absorbs at most one bullet.  Returns the number
/// of pairs removed.
pub fn resolve_bullet_hits(bullets: &mut Vec<Bullet>, aliens: &mut Vec<Alien>) -> usize {
    let mut killed_aliens = vec![false; aliens.len()];
    let mut used_bullets = vec![false; bullets.len()];
    let mut pairs = 0;

    for (bi, bullet) in bullets.iter().enumerate() {
        let target = aliens
            .iter()
            .enumerate()
            .find(|(ai, alien)| !killed_aliens[*ai] && bullet.rect.intersects(&alien.rect));
        if let Some((ai, _)) = target {
            killed_aliens[ai] = true;
            used_bullets[bi] = true;
            pairs += 1;
        }
    }

    if pairs > 0 {
        let mut flags = killed_aliens.into_iter();
        aliens.retain(|_| !flags.next().unwrap_or(false));
        let mut flags = used_bullets.into_iter();
        bullets.retain(|_| !flags.next().unwrap_or(false));
    }
    pairs
}

/// Score for a frame in which `destroyed` aliens were shot down.
pub fn score_for(destroyed: usize, alien_points: u64) -> u64 {
    alien_points * destroyed as u64
}

/// First lethal contact with the ship, if any: aliens are checked before
/// alien bullets.
pub fn ship_collision(ship: &Ship, aliens: &[Alien], alien_bullets: &[AlienBullet]) -> Option<ShipHit> {
    if aliens.iter().any(|alien| alien.rect.intersects(&ship.rect)) {
        return Some(ShipHit::Alien);
    }
    if alien_bullets
        .iter()
        .any(|bullet| bullet.rect.intersects(&ship.rect))
    {
        return Some(ShipHit::AlienBullet);
    }
    None
}

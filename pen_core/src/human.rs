//! A single livestock unit.

use pen_env::PenId;

/// Opaque handle to the sprite the renderer draws for a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// One human, owned by exactly one pen.
///
/// A human has no lifetime outside its pen's sequence: removing it from
/// the sequence destroys it.
#[derive(Debug, Clone, PartialEq)]
pub struct Human {
    /// Serial number, unique within the owning pen
    pub serial: u64,
    
    /// Owning pen (relation only, never used to reach the pen)
    pub pen: PenId,
    
    /// Sprite chosen by the renderer, if any
    pub sprite: Option<SpriteHandle>,
    
    /// Seconds spent in the pen
    pub age_secs: f64,
}

impl Human {
    /// Creates a newly arrived human.
    pub fn new(serial: u64, pen: PenId) -> Self {
        Self {
            serial,
            pen,
            sprite: None,
            age_secs: 0.0,
        }
    }
    
    /// Ages the human by one frame.
    pub fn update(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.age_secs += dt;
        }
    }
}

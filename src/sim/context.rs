//! Per-simulation services: random source, id allocator, clock
//!
//! Passed explicitly so independent simulations never share state.

use super::rng::Mulberry32;
use crate::error::ValidationError;
use crate::level::PlatformId;
use crate::platform::Clock;

/// Monotonic platform id source
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> Result<PlatformId, ValidationError> {
        let id = PlatformId(self.next);
        self.next = Self::after(id)?;
        Ok(id)
    }

    /// Make sure future ids never collide with `id`
    pub fn reserve_past(&mut self, id: PlatformId) -> Result<(), ValidationError> {
        self.next = self.next.max(Self::after(id)?);
        Ok(())
    }

    fn after(id: PlatformId) -> Result<u32, ValidationError> {
        id.0
            .checked_add(1)
            .ok_or(ValidationError::PlatformIdOverflow { id })
    }

    pub fn peek(&self) -> PlatformId {
        PlatformId(self.next)
    }
}

#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub rng: Mulberry32,
    pub ids: IdAllocator,
    pub clock: Clock,
}

impl SimulationContext {
    /// Seeded context on a virtual clock starting at 0 ms
    pub fn seeded(seed: u32) -> Self {
        Self {
            rng: Mulberry32::new(seed),
            ids: IdAllocator::new(),
            clock: Clock::default(),
        }
    }

    /// Seeded context measuring real time
    pub fn realtime(seed: u32) -> Self {
        Self {
            clock: Clock::system(),
            ..Self::seeded(seed)
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

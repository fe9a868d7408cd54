//! The pointillist renderer.
//!
//! A [`RenderSession`] owns a decoded image, a draw surface, and its own random stream and ink
//! budget. Each [`tick`][RenderSession::tick] spends one batch of budget and paints that many
//! jittered, semi-transparent dots sampled from the image. The surface is never cleared, so the
//! image resolves as dots pile up: large ones first, then progressively smaller ones.

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::Result;
use crate::math::{pixel_coords, RowRounding};
use crate::pixels::PixelBuffer;
use crate::rand::Rng;
use crate::schedule::RadiusSchedule;
use crate::surface::{Dot, DrawSurface};
use crate::timer::{Clock, Interval};

/// Each color channel is shifted by a value drawn from `-JITTER..JITTER`.
pub const JITTER: u32 = 60;

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Tick {
    /// The tick spent its batch and painted `dots` dots below `max_radius`.
    Drew { dots: u32, max_radius: f64 },
    /// The budget ran out on this tick. No dots were painted and the session is now inactive.
    Finished,
    /// The session was already inactive; nothing happened.
    Inactive,
}

pub struct RenderSession<S> {
    buffer: PixelBuffer,
    surface: S,
    rng: Rng,
    schedule: RadiusSchedule,
    batch_size: u32,
    rows: RowRounding,
    remaining_budget: i64,
    long_edge: u32,
    active: bool,
    band: Option<usize>,
    ticks: u64,
    dots_drawn: u64,
}

impl<S: DrawSurface> RenderSession<S> {
    /// Starts a session: sizes `surface` to match `buffer` and arms the full budget.
    ///
    /// Nothing is drawn until the first [`tick`][Self::tick].
    pub fn start(buffer: PixelBuffer, mut surface: S, config: &Config, rng: Rng) -> Result<Self> {
        config.validate()?;
        surface.resize(buffer.width(), buffer.height());
        info!(
            width = buffer.width(),
            height = buffer.height(),
            budget = config.budget,
            batch_size = config.batch_size,
            schedule = ?config.schedule,
            "starting render session"
        );
        Ok(RenderSession {
            long_edge: buffer.long_edge(),
            buffer,
            surface,
            rng,
            schedule: RadiusSchedule::new(config.schedule, config.budget),
            batch_size: config.batch_size,
            rows: config.rows(),
            remaining_budget: config.budget,
            active: true,
            band: None,
            ticks: 0,
            dots_drawn: 0,
        })
    }

    /// Spends one batch of budget.
    ///
    /// The budget is checked before drawing: the tick that brings it to zero or below draws
    /// nothing and deactivates the session. A session with budget `B` and batch size `N`
    /// therefore finishes on tick `ceil(B / N)` after drawing `N * (ceil(B / N) - 1)` dots.
    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Inactive;
        }
        self.ticks += 1;
        self.remaining_budget -= i64::from(self.batch_size);

        let Some(max_radius) = self
            .schedule
            .max_radius(self.remaining_budget, self.long_edge)
        else {
            self.active = false;
            info!(
                ticks = self.ticks,
                dots = self.dots_drawn,
                "render session finished"
            );
            return Tick::Finished;
        };

        let band = self.schedule.band_index(self.remaining_budget);
        if band != self.band {
            debug!(
                tick = self.ticks,
                remaining = self.remaining_budget,
                max_radius,
                "entering radius band {:?}",
                band
            );
            self.band = band;
        }

        for _ in 0..self.batch_size {
            let dot = self.sample(max_radius);
            self.surface.fill_dot(&dot);
        }
        self.dots_drawn += u64::from(self.batch_size);
        trace!(tick = self.ticks, remaining = self.remaining_budget, "tick");

        Tick::Drew {
            dots: self.batch_size,
            max_radius,
        }
    }

    fn sample(&mut self, max_radius: f64) -> Dot {
        let i = self.rng.below(self.buffer.pixel_count());
        let [r, g, b, _a] = self.buffer.rgba(i);
        let r = i16::from(r) + self.rng.offset(JITTER) as i16;
        let g = i16::from(g) + self.rng.offset(JITTER) as i16;
        let b = i16::from(b) + self.rng.offset(JITTER) as i16;
        let (x, y) = pixel_coords(i, self.buffer.width(), self.rows);
        let radius = (self.rng.rnd() * max_radius) as u32;
        Dot {
            x,
            y,
            radius,
            rgb: [r, g, b],
        }
    }

    /// Stops the session early. Later ticks draw nothing.
    pub fn cancel(&mut self) {
        if self.active {
            info!(ticks = self.ticks, "render session cancelled");
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_budget(&self) -> i64 {
        self.remaining_budget
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn dots_drawn(&self) -> u64 {
        self.dots_drawn
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Drives `session` on `interval` until the session becomes inactive or the interval is cancelled
/// from outside. `on_tick` observes the session after every tick. Returns the number of ticks run.
pub fn animate<S, C, F>(
    session: &mut RenderSession<S>,
    interval: &mut Interval<C>,
    mut on_tick: F,
) -> u64
where
    S: DrawSurface,
    C: Clock,
    F: FnMut(&RenderSession<S>, Tick),
{
    if !session.is_active() {
        return 0;
    }
    interval.run(|cancel| {
        let tick = session.tick();
        on_tick(session, tick);
        if !session.is_active() {
            cancel.cancel();
        }
    })
}

//! Telemetry sink trait: where position ticks and events go.

use dt_core::{EntityId, EntityKind};
use dt_events::Event;

/// One entity's telemetry record for one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionTick {
    pub entity:       EntityId,
    pub kind:         EntityKind,
    pub x:            f64,
    pub y:            f64,
    pub speed:        f64,
    /// Degrees in `[0, 360)`, counter-clockwise from +x.
    pub heading_deg:  f64,
    pub zone:         String,
    /// Synthetic positioning confidence in `[0.90, 1.00)`.
    pub confidence:   f64,
    pub timestamp_ms: i64,
}

/// Receiver of the two output streams.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Called from the tick thread only.
///
/// # Example: counting sink
///
/// ```rust
/// use dt_sim::{PositionTick, TelemetrySink};
///
/// #[derive(Default)]
/// struct Counter { ticks: usize }
///
/// impl TelemetrySink for Counter {
///     fn on_position_tick(&mut self, _batch: &[PositionTick]) {
///         self.ticks += 1;
///     }
/// }
/// ```
pub trait TelemetrySink {
    /// One batch per tick, one record per entity.
    fn on_position_tick(&mut self, _batch: &[PositionTick]) {}

    /// Once per detected event, after that tick's position batch.
    fn on_event(&mut self, _event: &Event) {}

    /// Called when the scheduler stops, after the last tick it ran.
    fn on_stop(&mut self) {}
}

/// A [`TelemetrySink`] that discards everything.
pub struct NoopSink;

impl TelemetrySink for NoopSink {}

/// Adapts two closures into a [`TelemetrySink`].
pub struct CallbackSink<P, E>
where
    P: FnMut(&[PositionTick]),
    E: FnMut(&Event),
{
    on_positions: P,
    on_event:     E,
}

impl<P, E> CallbackSink<P, E>
where
    P: FnMut(&[PositionTick]),
    E: FnMut(&Event),
{
    pub fn new(on_positions: P, on_event: E) -> Self {
        Self { on_positions, on_event }
    }
}

impl<P, E> TelemetrySink for CallbackSink<P, E>
where
    P: FnMut(&[PositionTick]),
    E: FnMut(&Event),
{
    fn on_position_tick(&mut self, batch: &[PositionTick]) {
        (self.on_positions)(batch);
    }

    fn on_event(&mut self, event: &Event) {
        (self.on_event)(event);
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &mut T {
    fn on_position_tick(&mut self, batch: &[PositionTick]) {
        (**self).on_position_tick(batch);
    }

    fn on_event(&mut self, event: &Event) {
        (**self).on_event(event);
    }

    fn on_stop(&mut self) {
        (**self).on_stop();
    }
}

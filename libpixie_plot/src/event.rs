use serde::Serialize;

/// One decoded list-mode trigger. This is a row of the aggregated event
/// table; rows are order-independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PixieEvent {
    pub channel: u32,
    pub slot: u32,
    pub crate_id: u32,
    pub energy: u32,
    /// 48-bit event time in ADC clock ticks (time high word shifted over the
    /// full low word)
    pub timestamp: u64,
    /// CFD fractional time as a fraction of one clock tick
    pub cfd_fractional_time: f64,
    pub cfd_forced_trigger: bool,
    pub energy_out_of_range: bool,
    pub finish_code: bool,
    #[serde(skip_serializing)]
    pub trace: Vec<u16>,
}

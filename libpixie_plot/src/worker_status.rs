#[derive(Debug, Clone, Default)]
pub enum BarColor {
    #[default]
    CYAN,
    MAGENTA,
    RED,
    GREEN,
}

/// Progress message sent by a decode worker to whoever is drawing progress
/// bars (typically the CLI)
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub worker_id: usize,
    pub color: BarColor,
}

impl WorkerStatus {
    pub fn new(progress: f32, worker_id: usize, color: BarColor) -> Self {
        Self {
            progress,
            worker_id,
            color,
        }
    }
}

pub mod d400_live_activity;

pub use d400_live_activity::ui::LiveActivityDashboard;

mod header;
mod result;
mod start;
mod state;
mod test_screen;

pub use header::Header;
pub use result::ResultPanel;
pub use start::StartView;
pub use state::ViewError;
pub use test_screen::TestView;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

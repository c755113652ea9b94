//! Flutter bridge for the People Memo layout core.

pub mod api;

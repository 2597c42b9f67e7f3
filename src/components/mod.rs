// Export components
pub mod google_calendar;
pub mod zoom;

// Re-export the API clients
pub use google_calendar::GoogleCalendarClient;
pub use zoom::ZoomClient;

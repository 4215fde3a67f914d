//! Background task event processing.
//!
//! Events arrive on the main loop's mpsc channel and are applied here,
//! synchronously, between frames. Favorite toggles are optimistic in the
//! input layer; this module reconciles them with what the database actually
//! committed.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FavoriteToggled { url, favorited } => {
            // The optimistic flip usually matches; a mismatch means two
            // rapid toggles raced and the database has the final word.
            let local = app.favorites.contains(&url);
            if local != favorited {
                tracing::debug!(url = %url, favorited, "Reconciling favorite with database");
                if favorited {
                    app.favorites.insert(url);
                } else {
                    app.favorites.remove(&url);
                }
                app.refresh_visible();
            }
        }

        AppEvent::FavoriteToggleFailed { url, error } => {
            tracing::warn!(url = %url, error = %error, "Favorite write failed, reverting");
            // Revert the optimistic flip.
            if !app.favorites.remove(&url) {
                app.favorites.insert(url);
            }
            app.refresh_visible();
            app.set_status("Failed to save favorite");
        }

        AppEvent::FaviconChecked { url, status } => {
            app.favicon_status.insert(url, status);
        }

        AppEvent::PreferenceWriteFailed { key, error } => {
            tracing::warn!(key = %key, error = %error, "Preference write failed");
            app.set_status("Failed to save settings");
        }

        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Background task failed: {}", task));
        }
    }
}

//! Session repair.
//!
//! Strips error pages and inline placeholders that qutebrowser keeps in tab
//! history after failed loads, then re-establishes the last surviving page
//! as the current one.

use tracing::debug;

use super::model::{ScrollPos, SessionTree};

/// Prune dead pages and reset the current page of every tab.
///
/// Takes the tree by value and returns the repaired one. Tabs that lose all
/// their entries stay in place as empty tabs, and windows are never
/// dropped. Running it twice gives the same result as running it once.
pub fn fix(mut session: SessionTree) -> SessionTree {
    for (w, window) in session.windows.iter_mut().enumerate() {
        for (t, tab) in window.tabs.iter_mut().enumerate() {
            let before = tab.entries.len();
            tab.entries.retain(|entry| !entry.is_dead_page());

            if tab.entries.len() != before {
                debug!(
                    window = w + 1,
                    tab = t + 1,
                    dropped = before - tab.entries.len(),
                    "pruned dead pages"
                );
            }

            if let Some(last) = tab.entries.last_mut() {
                last.scroll_pos = ScrollPos::ORIGIN;
                last.active = true;
                last.zoom = 1.0;
            }
        }
    }

    session
}

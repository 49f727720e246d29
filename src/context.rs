//! Everything a command needs from the outside world.

use crate::config::Config;
use crate::notify::Notifier;
use crate::selector::Selector;

/// Configuration plus the interactive collaborators, passed explicitly to
/// every command.
pub struct Context {
    pub config: Config,
    selector: Box<dyn Selector>,
    notifier: Box<dyn Notifier>,
}

impl Context {
    pub fn new(config: Config, selector: Box<dyn Selector>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            config,
            selector,
            notifier,
        }
    }

    pub fn selector(&self) -> &dyn Selector {
        self.selector.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

//! Navbar merge/insert.
//!
//! Buttons arrive asynchronously, one feature at a time, in whatever order
//! discovery and loading produce them. Placement only depends on the
//! configured feature order and each button's index within its feature, so
//! the final order is the same for every arrival order. Placed buttons are
//! never moved.

mod install;

pub use install::{install_buttons, ButtonDescriptor, ButtonItem};

use crate::config::NavbarConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub feature: String,
    /// Position within the feature's button descriptor.
    pub index: usize,
    /// Tab the button opens, matched against the home setting.
    pub tab: Option<String>,
    pub markup: String,
}

/// Result of [`Navbar::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placed {
    /// Inserted at this position.
    At(usize),
    /// Feature not in the configured order.
    Unranked,
    /// A button with the same feature and index is already present.
    Duplicate,
}

#[derive(Debug, Default, Clone)]
pub struct Navbar {
    order: Vec<String>,
    home: Option<String>,
    buttons: Vec<NavButton>,
    active: Option<(String, usize)>,
}

impl Navbar {
    /// `order` is a comma-separated feature list; entries are trimmed.
    pub fn new(order: &str, home: Option<&str>) -> Self {
        Self {
            order: order
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
            home: home.map(str::trim).filter(|h| !h.is_empty()).map(str::to_string),
            buttons: Vec::new(),
            active: None,
        }
    }

    pub fn from_config(cfg: &NavbarConfig) -> Self {
        Self::new(&cfg.order, cfg.home.as_deref())
    }

    /// Position of `feature` in the configured order.
    pub fn rank(&self, feature: &str) -> Option<usize> {
        self.order.iter().position(|f| f == feature)
    }

    pub fn contains_feature(&self, feature: &str) -> bool {
        self.buttons.iter().any(|b| b.feature == feature)
    }

    pub fn buttons(&self) -> &[NavButton] {
        &self.buttons
    }

    pub fn active(&self) -> Option<&NavButton> {
        let (feature, index) = self.active.as_ref()?;
        self.buttons
            .iter()
            .find(|b| &b.feature == feature && b.index == *index)
    }

    /// Marks a placed button active, e.g. after a user click.
    pub fn activate(&mut self, feature: &str, index: usize) -> bool {
        let found = self
            .buttons
            .iter()
            .any(|b| b.feature == feature && b.index == index);
        if found {
            self.active = Some((feature.to_string(), index));
        }
        found
    }

    /// Inserts `button` before the first placed button that ranks strictly
    /// after it (by feature order, then by index within the same feature), or
    /// appends it. Then, if nothing is active, activates this button when it
    /// is the home button, otherwise the first button.
    pub fn place(&mut self, button: NavButton) -> Placed {
        let Some(rank) = self.rank(&button.feature) else {
            tracing::debug!(feature = %button.feature, "feature not in navbar order, skipped");
            return Placed::Unranked;
        };
        if self
            .buttons
            .iter()
            .any(|b| b.feature == button.feature && b.index == button.index)
        {
            return Placed::Duplicate;
        }

        let pos = self
            .buttons
            .iter()
            .position(|b| match self.rank(&b.feature) {
                Some(r) if r > rank => true,
                Some(r) if r == rank => b.index > button.index,
                _ => false,
            })
            .unwrap_or(self.buttons.len());
        tracing::debug!(feature = %button.feature, index = button.index, pos, "navbar button placed");

        let is_home = self.is_home(&button);
        let identity = (button.feature.clone(), button.index);
        self.buttons.insert(pos, button);

        if self.active.is_none() {
            if is_home {
                self.active = Some(identity);
            } else if let Some(first) = self.buttons.first() {
                self.active = Some((first.feature.clone(), first.index));
            }
        }
        Placed::At(pos)
    }

    fn is_home(&self, button: &NavButton) -> bool {
        match &self.home {
            Some(home) => &button.feature == home || button.tab.as_ref() == Some(home),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests;

//! Scroll-position driven navigation state.

/// Navbar switches to its compact style past this scroll offset.
pub const NAVBAR_SCROLLED_AT: f64 = 50.0;
/// Sections count as current this many pixels before their top.
pub const SECTION_LEAD: f64 = 100.0;
/// Scroll-to-top button appears past this offset.
pub const SCROLL_TOP_VISIBLE_AT: f64 = 300.0;
/// Height of the fixed navbar subtracted from anchor targets.
pub const ANCHOR_OFFSET: f64 = 80.0;

/// Position of a page section with an `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    /// `offsetTop` of the section
    pub top: f64,
    /// `clientHeight` of the section
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Navbar state derived from one scroll position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavUpdate {
    /// Navbar has the `scrolled` class
    pub scrolled: bool,
    /// Id of the section under the viewport top
    pub active_section: Option<String>,
    /// Scroll-to-top button has the `show` class
    pub show_scroll_top: bool,
}

impl NavUpdate {
    /// Check if a nav link's `href` points at the active section.
    pub fn is_link_active(&self, href: &str) -> bool {
        match (&self.active_section, href.strip_prefix('#')) {
            (Some(active), Some(id)) => active == id,
            _ => false,
        }
    }
}

/// Compute the navbar state for `scroll_y`.
///
/// When several sections contain the position the last one in document
/// order wins.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{nav_update, SectionBounds};
///
/// let sections = [
///     SectionBounds::new("home", 0.0, 700.0),
///     SectionBounds::new("about", 700.0, 900.0),
/// ];
/// let update = nav_update(650.0, &sections);
/// assert!(update.scrolled);
/// assert_eq!(update.active_section.as_deref(), Some("about"));
/// assert!(update.is_link_active("#about"));
/// ```
pub fn nav_update(scroll_y: f64, sections: &[SectionBounds]) -> NavUpdate {
    let active_section = sections
        .iter()
        .rev()
        .find(|s| {
            let top = s.top - SECTION_LEAD;
            scroll_y >= top && scroll_y < top + s.height
        })
        .map(|s| s.id.clone());

    NavUpdate {
        scrolled: scroll_y > NAVBAR_SCROLLED_AT,
        active_section,
        show_scroll_top: scroll_y > SCROLL_TOP_VISIBLE_AT,
    }
}

/// Scroll destination for an in-page anchor whose section starts at `offset_top`.
pub fn anchor_scroll_target(offset_top: f64) -> f64 {
    (offset_top - ANCHOR_OFFSET).max(0.0)
}

/// Hero background parallax.
#[derive(Clone, Debug)]
pub struct Parallax {
    rate: f64,
    min_delta: f64,
    last_scroll_y: f64,
}

impl Default for Parallax {
    fn default() -> Self {
        Self {
            rate: -0.2,
            min_delta: 2.0,
            last_scroll_y: 0.0,
        }
    }
}

impl Parallax {
    /// Viewports this narrow get no parallax.
    pub const MAX_DISABLED_WIDTH: f64 = 768.0;

    /// Create the effect for a viewport, or `None` when it is too narrow.
    pub fn for_viewport(viewport_width: f64) -> Option<Self> {
        if viewport_width <= Self::MAX_DISABLED_WIDTH {
            None
        } else {
            Some(Self::default())
        }
    }

    /// Vertical translation for `scroll_y`, or `None` if the scroll moved too little.
    pub fn update(&mut self, scroll_y: f64) -> Option<f64> {
        if (scroll_y - self.last_scroll_y).abs() < self.min_delta {
            return None;
        }
        self.last_scroll_y = scroll_y;
        Some(scroll_y * self.rate)
    }

    /// CSS transform for a translation.
    pub fn transform(offset: f64) -> String {
        format!("translate3d(0, {}px, 0)", offset)
    }
}

/// Key handled by the skills keyboard navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Activate,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(NavKey::Left),
            "ArrowRight" => Some(NavKey::Right),
            "Enter" | " " => Some(NavKey::Activate),
            _ => None,
        }
    }
}

/// What the host should do after a navigation key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Focus the button at this index
    Focus(usize),
    /// Click the focused element
    Activate,
}

/// Focus tracking across the skills category buttons.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyboardNav {
    index: usize,
    count: usize,
}

impl KeyboardNav {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// A button received focus by other means.
    pub fn focused(&mut self, index: usize) {
        if index < self.count {
            self.index = index;
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Handle a key. Returns `None` when there are no buttons.
    pub fn on_key(&mut self, key: NavKey) -> Option<NavAction> {
        if self.count == 0 {
            return None;
        }
        match key {
            NavKey::Left => {
                self.index = self.index.saturating_sub(1);
                Some(NavAction::Focus(self.index))
            }
            NavKey::Right => {
                self.index = (self.index + 1).min(self.count - 1);
                Some(NavAction::Focus(self.index))
            }
            NavKey::Activate => Some(NavAction::Activate),
        }
    }
}

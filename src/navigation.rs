//! Screen routing and the navigation bar.

use maud::{Markup, html};

use crate::Session;

/// The screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The sign-up and sign-in screen.
    Auth,
    /// Summary cards, charts and the filtered transaction table.
    Dashboard,
    /// The full transaction list with add, edit and delete.
    Transactions,
    /// The category list with add, edit and delete.
    Categories,
}

impl Screen {
    /// Every screen, in navigation bar order.
    pub const ALL: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Transactions,
        Screen::Categories,
        Screen::Auth,
    ];

    /// The screen at `path`, if there is one.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.path() == path)
    }

    /// The route of the screen.
    pub fn path(self) -> &'static str {
        match self {
            Screen::Auth => "/auth",
            Screen::Dashboard => "/dashboard",
            Screen::Transactions => "/transactions",
            Screen::Categories => "/categories",
        }
    }

    /// The name shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Auth => "Sign in",
            Screen::Dashboard => "Dashboard",
            Screen::Transactions => "Transactions",
            Screen::Categories => "Categories",
        }
    }

    /// Whether the screen needs a signed in user.
    pub fn is_protected(self) -> bool {
        self != Screen::Auth
    }
}

/// Where a viewer ends up after asking for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the requested screen.
    Allow(Screen),
    /// Send the viewer to another screen instead.
    Redirect(Screen),
}

impl Navigation {
    /// The screen that will be shown.
    pub fn screen(self) -> Screen {
        match self {
            Navigation::Allow(screen) | Navigation::Redirect(screen) => screen,
        }
    }
}

/// Decide where a viewer asking for `path` should end up.
///
/// Unknown paths are treated as the dashboard. Signed out viewers are sent to
/// the auth screen and signed in viewers are sent away from it.
pub fn resolve(session: Option<&Session>, path: &str) -> Navigation {
    let requested = Screen::from_path(path);
    let screen = requested.unwrap_or(Screen::Dashboard);

    let navigation = match (session, screen.is_protected()) {
        (None, true) => Navigation::Redirect(Screen::Auth),
        (Some(_), false) => Navigation::Redirect(Screen::Dashboard),
        _ if requested.is_none() => Navigation::Redirect(screen),
        _ => Navigation::Allow(screen),
    };

    tracing::debug!("Resolved {path} to {navigation:?}");

    navigation
}

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to `true`. Only one link
/// should be set as active at any one time.
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")] { (self.title) } )
    }
}

/// The navigation bar shown at the top of every protected screen.
pub struct NavBar {
    links: Vec<Link>,
    username: Option<String>,
}

impl NavBar {
    /// Get the navigation bar with `active` marked as the current screen.
    pub fn new(active: Screen, session: &Session) -> Self {
        let links = Screen::ALL
            .into_iter()
            .filter(|screen| screen.is_protected())
            .map(|screen| Link {
                url: screen.path(),
                title: screen.title(),
                is_current: screen == active,
            })
            .collect();

        Self {
            links,
            username: session.username.clone(),
        }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    span
                        class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Expense Manager"
                    }

                    ul
                        class="font-medium flex flex-row space-x-8 rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }

                    @if let Some(username) = self.username {
                        span class="text-sm text-gray-600 dark:text-gray-300" { (username) }
                    }
                }
            }
        )
    }
}

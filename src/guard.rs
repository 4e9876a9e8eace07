//! Screen access control.
//!
//! Each [`Route`] is wrapped by one [`Guard`]. Guards are only evaluated once
//! bootstrap has finished; until then every check is [`Access::Pending`].

use crate::bootstrap::BootState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Categories,
    Login,
    Register,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Categories => "/category",
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    pub fn guard(&self) -> Guard {
        match self {
            Self::Home | Self::Categories => Guard::RequireAuth,
            Self::Login | Self::Register => Guard::RequireGuest,
        }
    }

    /// Screens shown in the tab bar for the given sign-in state.
    pub fn tabs(signed_in: bool) -> &'static [Route] {
        if signed_in {
            &[Self::Home, Self::Categories]
        } else {
            &[Self::Login, Self::Register]
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Categories => write!(f, "Categories"),
            Self::Login => write!(f, "Login"),
            Self::Register => write!(f, "Register"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    RequireAuth,
    RequireGuest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Bootstrap still running; show the loading screen.
    Pending,
    Admit,
    /// Go elsewhere, replacing the current history entry.
    Redirect(Route),
}

/// `signed_in` is "session authenticated OR persisted token present".
pub fn check(guard: Guard, boot: BootState, signed_in: bool) -> Access {
    if boot == BootState::Loading {
        return Access::Pending;
    }
    match (guard, signed_in) {
        (Guard::RequireAuth, true) | (Guard::RequireGuest, false) => Access::Admit,
        (Guard::RequireAuth, false) => Access::Redirect(Route::Login),
        (Guard::RequireGuest, true) => Access::Redirect(Route::Home),
    }
}

/// History of visited screens.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Login)
    }

    #[cfg(test)]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Push `route` and resolve its guard.
    pub fn navigate(&mut self, route: Route, boot: BootState, signed_in: bool) -> Access {
        if self.current() != route {
            self.history.push(route);
        }
        self.resolve(boot, signed_in)
    }

    /// Re-check the current screen, following at most one redirect.
    ///
    /// Returns `Redirect(target)` when the top entry was replaced by `target`.
    pub fn resolve(&mut self, boot: BootState, signed_in: bool) -> Access {
        match check(self.current().guard(), boot, signed_in) {
            Access::Redirect(target) => {
                self.replace(target);
                Access::Redirect(target)
            }
            access => access,
        }
    }

    /// Pop one entry; the first entry is never popped.
    pub fn back(&mut self, boot: BootState, signed_in: bool) -> Access {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.resolve(boot, signed_in)
    }

    fn replace(&mut self, route: Route) {
        self.history.pop();
        // Collapse a duplicate left behind by the replacement
        if self.history.last() != Some(&route) {
            self.history.push(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: BootState = BootState::Ready;

    #[test]
    fn test_pending_while_loading() {
        for guard in [Guard::RequireAuth, Guard::RequireGuest] {
            for signed_in in [true, false] {
                assert_eq!(check(guard, BootState::Loading, signed_in), Access::Pending);
            }
        }
    }

    #[test]
    fn test_require_auth() {
        assert_eq!(check(Guard::RequireAuth, READY, true), Access::Admit);
        assert_eq!(
            check(Guard::RequireAuth, READY, false),
            Access::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_require_guest() {
        assert_eq!(check(Guard::RequireGuest, READY, false), Access::Admit);
        assert_eq!(
            check(Guard::RequireGuest, READY, true),
            Access::Redirect(Route::Home)
        );
    }

    #[test]
    fn test_route_guards() {
        assert_eq!(Route::Home.guard(), Guard::RequireAuth);
        assert_eq!(Route::Categories.guard(), Guard::RequireAuth);
        assert_eq!(Route::Login.guard(), Guard::RequireGuest);
        assert_eq!(Route::Register.guard(), Guard::RequireGuest);
        assert_eq!(Route::Login.path(), "/login");
    }

    #[test]
    fn test_redirect_replaces_history() {
        let mut nav = Navigator::new(Route::Login);
        let access = nav.navigate(Route::Categories, READY, false);
        assert_eq!(access, Access::Redirect(Route::Login));
        // The guarded page is gone from history, no back-navigation into it
        assert_eq!(nav.history(), &[Route::Login]);
        assert_eq!(nav.current(), Route::Login);
    }

    #[test]
    fn test_admitted_navigation_pushes() {
        let mut nav = Navigator::new(Route::Home);
        assert_eq!(nav.navigate(Route::Categories, READY, true), Access::Admit);
        assert_eq!(nav.history(), &[Route::Home, Route::Categories]);

        assert_eq!(nav.back(READY, true), Access::Admit);
        assert_eq!(nav.current(), Route::Home);
        // Never pops the first entry
        nav.back(READY, true);
        assert_eq!(nav.history(), &[Route::Home]);
    }

    #[test]
    fn test_guest_redirected_home_after_login() {
        let mut nav = Navigator::new(Route::Login);
        assert_eq!(nav.resolve(READY, true), Access::Redirect(Route::Home));
        assert_eq!(nav.history(), &[Route::Home]);
    }

    #[test]
    fn test_logout_redirects_protected_screen() {
        let mut nav = Navigator::new(Route::Home);
        nav.navigate(Route::Categories, READY, true);
        assert_eq!(nav.resolve(READY, false), Access::Redirect(Route::Login));
        assert_eq!(nav.current(), Route::Login);
    }

    #[test]
    fn test_navigate_while_loading_is_pending() {
        let mut nav = Navigator::new(Route::Home);
        assert_eq!(nav.resolve(BootState::Loading, false), Access::Pending);
        assert_eq!(nav.current(), Route::Home);
    }

    #[test]
    fn test_tabs() {
        assert_eq!(Route::tabs(true), &[Route::Home, Route::Categories]);
        assert_eq!(Route::tabs(false), &[Route::Login, Route::Register]);
    }
}

//! Route-level access control
//!
//! A pure decision function mapping (path, auth state) to an action.
//! Rendering and actual navigation are the caller's concern.

use serde::{Deserialize, Serialize};

/// Client-side route paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Entry path, always redirects
    Root,
    /// Dashboard
    Home,
    /// Add-transaction form
    AddTransaction,
    /// Shared-finance partner page
    Duo,
    /// Profile page
    Profile,
    /// Login form
    Login,
    /// Signup form
    Signup,
}

impl Route {
    /// The canonical path string for this route
    pub fn as_path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Home => "/home",
            Route::AddTransaction => "/adicionar",
            Route::Duo => "/dupla",
            Route::Profile => "/perfil",
            Route::Login => "/login",
            Route::Signup => "/signup",
        }
    }

    /// Whether this route requires an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::AddTransaction | Route::Duo | Route::Profile
        )
    }

    /// Whether this route hosts the login/signup forms
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

impl std::str::FromStr for Route {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/" => Ok(Route::Root),
            "/home" => Ok(Route::Home),
            "/adicionar" => Ok(Route::AddTransaction),
            "/dupla" => Ok(Route::Duo),
            "/perfil" => Ok(Route::Profile),
            "/login" => Ok(Route::Login),
            "/signup" => Ok(Route::Signup),
            _ => Err(format!("Unknown route: {}", s)),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// Outcome of resolving a requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteAction {
    /// Render the requested route
    Render(Route),
    /// Send the user to the login form
    RedirectToAuth,
    /// Send the user to the dashboard
    RedirectToHome,
    /// Path is not part of the application
    NotFound,
}

/// Decide what to do with a requested path
///
/// Deterministic in its two inputs; never touches session state itself.
pub fn resolve(path: &str, is_authenticated: bool) -> RouteAction {
    let route = match path.parse::<Route>() {
        Ok(route) => route,
        Err(_) => return RouteAction::NotFound,
    };

    match route {
        Route::Root => {
            if is_authenticated {
                RouteAction::RedirectToHome
            } else {
                RouteAction::RedirectToAuth
            }
        }
        _ if route.is_protected() && !is_authenticated => RouteAction::RedirectToAuth,
        _ if route.is_auth_page() && is_authenticated => RouteAction::RedirectToHome,
        _ => RouteAction::Render(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_route_requires_auth() {
        assert_eq!(resolve("/home", false), RouteAction::RedirectToAuth);
        assert_eq!(resolve("/adicionar", false), RouteAction::RedirectToAuth);
        assert_eq!(resolve("/dupla", false), RouteAction::RedirectToAuth);
        assert_eq!(resolve("/perfil", false), RouteAction::RedirectToAuth);
    }

    #[test]
    fn test_protected_route_renders_when_authenticated() {
        assert_eq!(resolve("/home", true), RouteAction::Render(Route::Home));
        assert_eq!(
            resolve("/adicionar", true),
            RouteAction::Render(Route::AddTransaction)
        );
    }

    #[test]
    fn test_auth_pages_redirect_when_authenticated() {
        assert_eq!(resolve("/login", true), RouteAction::RedirectToHome);
        assert_eq!(resolve("/signup", true), RouteAction::RedirectToHome);
    }

    #[test]
    fn test_auth_pages_render_when_unauthenticated() {
        assert_eq!(resolve("/login", false), RouteAction::Render(Route::Login));
        assert_eq!(resolve("/signup", false), RouteAction::Render(Route::Signup));
    }

    #[test]
    fn test_root_redirects_by_auth_state() {
        assert_eq!(resolve("/", true), RouteAction::RedirectToHome);
        assert_eq!(resolve("/", false), RouteAction::RedirectToAuth);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(resolve("/unknown-path", true), RouteAction::NotFound);
        assert_eq!(resolve("/unknown-path", false), RouteAction::NotFound);
        assert_eq!(resolve("", true), RouteAction::NotFound);
    }

    #[test]
    fn test_route_path_roundtrip() {
        for route in [
            Route::Root,
            Route::Home,
            Route::AddTransaction,
            Route::Duo,
            Route::Profile,
            Route::Login,
            Route::Signup,
        ] {
            assert_eq!(route.as_path().parse::<Route>(), Ok(route));
        }
    }
}

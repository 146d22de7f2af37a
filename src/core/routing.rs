use crate::domain::model::{Role, UserProfile};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Cars,
    About,
    Contact,
    AdminDashboard,
    AgentDashboard,
    CustomerDashboard,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Cars => "/cars",
            Route::About => "/about",
            Route::Contact => "/contact",
            Route::AdminDashboard => "/dashboard/admin",
            Route::AgentDashboard => "/dashboard/agent",
            Route::CustomerDashboard => "/dashboard/customer",
            Route::NotFound => "*",
        }
    }

    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/cars" => Route::Cars,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/dashboard/admin" => Route::AdminDashboard,
            "/dashboard/agent" => Route::AgentDashboard,
            "/dashboard/customer" => Route::CustomerDashboard,
            _ => Route::NotFound,
        }
    }

    /// Roles allowed through, or `None` for public routes.
    pub fn allowed_roles(&self) -> Option<Vec<Role>> {
        match self {
            Route::AdminDashboard => Some(vec![Role::Admin]),
            Route::AgentDashboard => Some(vec![Role::RentalAgent]),
            Route::CustomerDashboard => {
                Some(vec![Role::Customer, Role::Admin, Role::RentalAgent])
            }
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.allowed_roles().is_some()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Client-side gate: a token must be present, then the role must be on the route's
/// allow-list. Nothing about the token itself is checked.
pub fn guard(route: Route, has_token: bool, role: Option<&Role>) -> Access {
    let Some(allowed) = route.allowed_roles() else {
        return Access::Allow;
    };
    if !has_token {
        return Access::Redirect(Route::Login);
    }
    match role {
        None => Access::Redirect(Route::Login),
        Some(role) if allowed.contains(role) => Access::Allow,
        Some(_) => Access::Redirect(Route::Home),
    }
}

/// Where a freshly signed-in user lands. Any loaded profile that is not
/// staff goes to the customer dashboard; no profile at all goes home.
pub fn landing_route(profile: Option<&UserProfile>) -> Route {
    let Some(profile) = profile else {
        return Route::Home;
    };
    match profile.role() {
        Some(Role::Admin) => Route::AdminDashboard,
        Some(Role::RentalAgent) => Route::AgentDashboard,
        _ => Route::CustomerDashboard,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// `None` for the logout action.
    pub route: Option<Route>,
}

impl NavItem {
    fn link(label: &'static str, route: Route) -> Self {
        Self {
            label,
            route: Some(route),
        }
    }
}

pub fn nav_items(has_token: bool, role: Option<&Role>) -> Vec<NavItem> {
    let mut items = vec![
        NavItem::link("Home", Route::Home),
        NavItem::link("Cars", Route::Cars),
        NavItem::link("About", Route::About),
        NavItem::link("Contact", Route::Contact),
    ];

    if !has_token {
        items.push(NavItem::link("Login", Route::Login));
        items.push(NavItem::link("Sign Up", Route::Signup));
        return items;
    }

    match role {
        Some(Role::Admin) => items.push(NavItem::link("Admin", Route::AdminDashboard)),
        Some(Role::RentalAgent) => items.push(NavItem::link("Agent", Route::AgentDashboard)),
        Some(Role::Customer) => items.push(NavItem::link("My Area", Route::CustomerDashboard)),
        _ => {}
    }
    items.push(NavItem {
        label: "Logout",
        route: None,
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_routes_always_allowed() {
        for route in [Route::Home, Route::Cars, Route::Login, Route::NotFound] {
            assert_eq!(guard(route, false, None), Access::Allow);
        }
    }

    #[test]
    fn test_missing_token_or_role_redirects_to_login() {
        assert_eq!(
            guard(Route::AdminDashboard, false, Some(&Role::Admin)),
            Access::Redirect(Route::Login)
        );
        assert_eq!(
            guard(Route::CustomerDashboard, true, None),
            Access::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_role_allow_lists() {
        assert_eq!(guard(Route::AdminDashboard, true, Some(&Role::Admin)), Access::Allow);
        assert_eq!(
            guard(Route::AdminDashboard, true, Some(&Role::RentalAgent)),
            Access::Redirect(Route::Home)
        );
        assert_eq!(
            guard(Route::AgentDashboard, true, Some(&Role::Admin)),
            Access::Redirect(Route::Home)
        );
        assert_eq!(
            guard(Route::CustomerDashboard, true, Some(&Role::RentalAgent)),
            Access::Allow
        );
        assert_eq!(
            guard(
                Route::CustomerDashboard,
                true,
                Some(&Role::Other("Auditor".to_string()))
            ),
            Access::Redirect(Route::Home)
        );
    }

    #[test]
    fn test_landing_routes() {
        let profile = UserProfile::new;
        assert_eq!(
            landing_route(Some(&profile(json!({"roleName": "Admin"})))),
            Route::AdminDashboard
        );
        assert_eq!(
            landing_route(Some(&profile(json!({"role": "RentalAgent"})))),
            Route::AgentDashboard
        );
        assert_eq!(
            landing_route(Some(&profile(json!({"roleName": "Customer"})))),
            Route::CustomerDashboard
        );
        assert_eq!(
            landing_route(Some(&profile(json!({"email": "a@b.c"})))),
            Route::CustomerDashboard
        );
        assert_eq!(landing_route(None), Route::Home);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::from_path("/dashboard/agent/"), Route::AgentDashboard);
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::CustomerDashboard.to_string(), "/dashboard/customer");
    }

    #[test]
    fn test_nav_items() {
        let anonymous: Vec<&str> = nav_items(false, None).iter().map(|i| i.label).collect();
        assert_eq!(anonymous, vec!["Home", "Cars", "About", "Contact", "Login", "Sign Up"]);

        let customer = nav_items(true, Some(&Role::Customer));
        assert!(customer
            .iter()
            .any(|i| i.label == "My Area" && i.route == Some(Route::CustomerDashboard)));
        assert_eq!(customer.last().unwrap().route, None);
    }
}

//! Route table and path resolution.

use crate::guard::{self, GuardDecision};
use crate::navigation::Navigation;
use crate::session::SessionSnapshot;

/// Every view the console knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Branches,
    NewSale,
    SalesToday,
    SalesHistory,
    SalesPending,
    ProductCatalog,
    Inventory,
    Categories,
    Customers,
    SalesReport,
    InventoryReport,
    FinancialReport,
    Settings,
}

impl Route {
    pub const ALL: [Route; 15] = [
        Route::Login,
        Route::Dashboard,
        Route::Branches,
        Route::NewSale,
        Route::SalesToday,
        Route::SalesHistory,
        Route::SalesPending,
        Route::ProductCatalog,
        Route::Inventory,
        Route::Categories,
        Route::Customers,
        Route::SalesReport,
        Route::InventoryReport,
        Route::FinancialReport,
        Route::Settings,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Branches => "/sucursales",
            Self::NewSale => "/nueva-venta",
            Self::SalesToday => "/ventas/dia",
            Self::SalesHistory => "/ventas/historial",
            Self::SalesPending => "/ventas/pendientes",
            Self::ProductCatalog => "/productos/catalogo",
            Self::Inventory => "/productos/inventario",
            Self::Categories => "/productos/categorias",
            Self::Customers => "/clientes",
            Self::SalesReport => "/reportes/ventas",
            Self::InventoryReport => "/reportes/inventario",
            Self::FinancialReport => "/reportes/financiero",
            Self::Settings => "/configuracion",
        }
    }

    /// Match a location, ignoring query, fragment and a trailing slash.
    #[must_use]
    pub fn from_path(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Everything except the login view needs a session.
    #[must_use]
    pub fn is_protected(self) -> bool {
        self != Self::Login
    }

    /// Modules whose backend does not exist yet; they render a placeholder.
    #[must_use]
    pub fn is_pending(self) -> bool {
        !matches!(self, Self::Login | Self::Dashboard | Self::Branches)
    }
}

/// Outcome of resolving a location against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Loading,
    Redirect(Navigation),
    NotFound,
}

/// Resolve `location` to what should be on screen.
#[must_use]
pub fn resolve(location: &str, session: &SessionSnapshot) -> Resolution {
    let Some(route) = Route::from_path(location) else {
        return Resolution::NotFound;
    };
    if !route.is_protected() {
        return Resolution::Render(route);
    }
    match guard::decide_for(session) {
        GuardDecision::Loading => Resolution::Loading,
        GuardDecision::Redirect(to) => Resolution::Redirect(to),
        GuardDecision::Render => Resolution::Render(route),
    }
}

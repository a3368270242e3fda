// ============================================================================
// ROUTES - Tabla de rutas de la app (pública + admin)
// ============================================================================

/// A qué superficie pertenece una ruta (y qué guard la protege)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Public,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    SubmitTicket,
    Tickets,
    TicketDetail(String),
    AdminLogin,
    AdminTickets,
    AdminUnclaimed,
    AdminMyClaims,
    AdminTicketDetail(i64),
    NotFound(String),
}

impl Route {
    /// Parsear un pathname (se ignoran query y hash)
    pub fn parse(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Route::Dashboard,
            ["login"] => Route::Login,
            ["submit"] => Route::SubmitTicket,
            ["tickets"] => Route::Tickets,
            ["tickets", id] => Route::TicketDetail((*id).to_string()),
            ["admin"] | ["admin", "tickets"] => Route::AdminTickets,
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "unclaimed"] => Route::AdminUnclaimed,
            ["admin", "my-claims"] => Route::AdminMyClaims,
            ["admin", "tickets", id] => match id.parse::<i64>() {
                Ok(id) => Route::AdminTicketDetail(id),
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::SubmitTicket => "/submit".to_string(),
            Route::Tickets => "/tickets".to_string(),
            Route::TicketDetail(id) => format!("/tickets/{}", id),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::AdminTickets => "/admin/tickets".to_string(),
            Route::AdminUnclaimed => "/admin/unclaimed".to_string(),
            Route::AdminMyClaims => "/admin/my-claims".to_string(),
            Route::AdminTicketDetail(id) => format!("/admin/tickets/{}", id),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// None para 404
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Route::Login
            | Route::Dashboard
            | Route::SubmitTicket
            | Route::Tickets
            | Route::TicketDetail(_) => Some(Domain::Public),
            Route::AdminLogin
            | Route::AdminTickets
            | Route::AdminUnclaimed
            | Route::AdminMyClaims
            | Route::AdminTicketDetail(_) => Some(Domain::Admin),
            Route::NotFound(_) => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::AdminLogin | Route::NotFound(_))
    }
}

/// Destino tras el login público. Solo rutas públicas protegidas; cualquier
/// otra cosa (login, admin, otro origen, 404) vuelve al dashboard.
pub fn return_target(return_to: Option<&str>) -> Route {
    let Some(raw) = return_to else {
        return Route::Dashboard;
    };
    if !raw.starts_with('/') || raw.starts_with("//") {
        return Route::Dashboard;
    }
    match Route::parse(raw) {
        route if route.is_protected() && route.domain() == Some(Domain::Public) => route,
        _ => Route::Dashboard,
    }
}

/// Valor de un parámetro de query (`?return_to=/tickets/3`)
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| percent_decode(v))
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let hex = bytes
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok());
        match (bytes[i], hex) {
            (b'%', Some(byte)) => {
                decoded.push(byte);
                i += 3;
            }
            (b'+', _) => {
                decoded.push(b' ');
                i += 1;
            }
            (byte, _) => {
                decoded.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_public_routes() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/tickets"), Route::Tickets);
        assert_eq!(Route::parse("/tickets/abc-1?tab=x"), Route::TicketDetail("abc-1".into()));
        assert_eq!(Route::parse("/submit#top"), Route::SubmitTicket);
    }

    #[test]
    fn parses_admin_routes() {
        assert_eq!(Route::parse("/admin"), Route::AdminTickets);
        assert_eq!(Route::parse("/admin/login"), Route::AdminLogin);
        assert_eq!(Route::parse("/admin/my-claims"), Route::AdminMyClaims);
        assert_eq!(Route::parse("/admin/tickets/42"), Route::AdminTicketDetail(42));
        assert_eq!(Route::parse("/admin/tickets/abc"), Route::NotFound("/admin/tickets/abc".into()));
    }

    #[test]
    fn path_round_trips() {
        for route in [
            Route::Login,
            Route::Dashboard,
            Route::TicketDetail("t-9".into()),
            Route::AdminUnclaimed,
            Route::AdminTicketDetail(7),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn reads_encoded_return_to() {
        assert_eq!(
            query_param("?return_to=%2Ftickets%2F3&x=1", "return_to").as_deref(),
            Some("/tickets/3")
        );
        assert_eq!(query_param("", "return_to"), None);
    }

    #[test]
    fn return_target_keeps_public_pages() {
        assert_eq!(return_target(Some("/tickets/9")), Route::TicketDetail("9".into()));
        assert_eq!(return_target(Some("/submit?x=1")), Route::SubmitTicket);
        assert_eq!(return_target(None), Route::Dashboard);
    }

    #[test]
    fn return_target_rejects_loops_and_foreign_targets() {
        for raw in [
            "/login",
            "/admin/login",
            "/admin/tickets",
            "/nope",
            "https://other.origin/tickets",
            "//other.origin/tickets",
            "tickets",
            "",
        ] {
            assert_eq!(return_target(Some(raw)), Route::Dashboard, "{}", raw);
        }
    }

    #[test]
    fn login_routes_are_not_protected() {
        assert!(!Route::Login.is_protected());
        assert!(!Route::AdminLogin.is_protected());
        assert!(Route::Tickets.is_protected());
        assert_eq!(Route::AdminLogin.domain(), Some(Domain::Admin));
        assert_eq!(Route::parse("/nope").domain(), None);
    }
}

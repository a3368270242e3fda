use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de un ticket visto desde la superficie admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminTicketStatus {
    Open,
    #[serde(rename = "In Progress", alias = "in_progress")]
    InProgress,
    Resolved,
}

impl AdminTicketStatus {
    pub const ALL: [AdminTicketStatus; 3] = [
        AdminTicketStatus::Open,
        AdminTicketStatus::InProgress,
        AdminTicketStatus::Resolved,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTicketStatus::Open => "Open",
            AdminTicketStatus::InProgress => "In Progress",
            AdminTicketStatus::Resolved => "Resolved",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

/// Ticket en la lista admin (GET /admin/tickets)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminTicket {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: AdminTicketStatus,
    pub user_id: i64,
    pub engineer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl AdminTicket {
    pub fn is_claimed(&self) -> bool {
        self.engineer_id.is_some()
    }
}

/// Detalle admin (GET /admin/tickets/{id})
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminTicketDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: AdminTicketStatus,
    pub user_id: i64,
    pub engineer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<AdminComment>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl AdminTicketDetail {
    /// Aplicar la representación devuelta por claim/status sin perder hilos cargados
    pub fn apply_update(&mut self, ticket: &AdminTicket) {
        self.title = ticket.title.clone();
        self.status = ticket.status;
        self.engineer_id = ticket.engineer_id;
        if !ticket.description.is_empty() {
            self.description = ticket.description.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminComment {
    pub id: i64,
    pub author_id: i64,
    pub ticket_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Sugerencia histórica (error → solución)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub ticket_id: Option<i64>,
    pub error_snippet: String,
    pub suggestion_text: String,
}

/// Respuesta de GET /admin/tickets/{id}/suggestions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorSuggestions {
    #[serde(default)]
    pub past: Vec<PastSuggestion>,
    #[serde(default)]
    pub docs: Vec<DocSuggestion>,
}

impl VectorSuggestions {
    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.docs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastSuggestion {
    pub ticket_id: i64,
    pub snippet: String,
    pub solved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocSuggestion {
    pub doc_id: String,
    pub filename: String,
    pub snippet: String,
    pub full_text: String,
    pub section_heading: Option<String>,
}

/// Body de PATCH /admin/tickets/{id}/status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub status: AdminTicketStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_ticket_parses_backend_payload() {
        let json = r#"{
            "id": 42,
            "title": "Printer down",
            "description": "Won't power on",
            "status": "In Progress",
            "user_id": 7,
            "engineer_id": null,
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let ticket: AdminTicket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, 42);
        assert_eq!(ticket.status, AdminTicketStatus::InProgress);
        assert!(!ticket.is_claimed());
    }

    #[test]
    fn apply_update_keeps_threads() {
        let mut detail: AdminTicketDetail = serde_json::from_str(
            r#"{
                "id": 1, "title": "T", "description": "D", "status": "Open",
                "user_id": 2, "engineer_id": null, "created_at": "2024-05-01T10:00:00Z",
                "comments": [{"id": 9, "author_id": 2, "ticket_id": 1, "text": "hi",
                              "created_at": "2024-05-01T11:00:00Z"}]
            }"#,
        )
        .unwrap();
        let claimed = AdminTicket {
            id: 1,
            title: "T".into(),
            description: String::new(),
            status: AdminTicketStatus::Open,
            user_id: 2,
            engineer_id: Some(5),
            created_at: detail.created_at,
        };

        detail.apply_update(&claimed);
        assert_eq!(detail.engineer_id, Some(5));
        assert_eq!(detail.description, "D");
        assert_eq!(detail.comments.len(), 1);
    }

    #[test]
    fn empty_suggestions_payload() {
        let suggestions: VectorSuggestions = serde_json::from_str("{}").unwrap();
        assert!(suggestions.is_empty());
    }
}

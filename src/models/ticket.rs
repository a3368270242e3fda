use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de un ticket público
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[serde(alias = "open", alias = "OPEN")]
    Open,
    #[serde(rename = "In Progress", alias = "in_progress", alias = "in-progress", alias = "InProgress")]
    InProgress,
    // El backend admin habla de "Resolved"; para el usuario es un ticket cerrado
    #[serde(alias = "closed", alias = "Resolved", alias = "resolved")]
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [TicketStatus::Open, TicketStatus::InProgress, TicketStatus::Closed];

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Closed => "Closed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub ticket_id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Body de POST /tickets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
}

/// Body de POST /tickets/{id}/comments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_backend_spellings() {
        let parsed: Vec<TicketStatus> =
            serde_json::from_str(r#"["Open", "in_progress", "In Progress", "Resolved", "closed"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                TicketStatus::Open,
                TicketStatus::InProgress,
                TicketStatus::InProgress,
                TicketStatus::Closed,
                TicketStatus::Closed,
            ]
        );
        assert_eq!(serde_json::to_string(&TicketStatus::InProgress).unwrap(), r#""In Progress""#);
    }

    #[test]
    fn ticket_without_comments_field_parses() {
        let json = r#"{
            "id": "t-1",
            "title": "VPN drops",
            "description": "Every 10 minutes",
            "status": "Open",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert!(ticket.comments.is_empty());
        assert_eq!(ticket.status, TicketStatus::Open);
    }

    #[test]
    fn labels_round_trip() {
        for status in TicketStatus::ALL {
            assert_eq!(TicketStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(TicketStatus::from_label("All"), None);
    }
}

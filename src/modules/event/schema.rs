use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::user::model::UserDetails;

pub const FRIENDSHIP_AGGREGATE: &str = "Friendship";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    FriendRequested,
    FriendRequestAccepted,
}

/// Notification-bound event emitted on a friendship state transition.
///
/// `subject_id` is the user the notification is addressed to; `user` is the
/// participant whose action caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub event_id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub subject_id: i64,
    pub user: UserDetails,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

impl DomainEvent {
    fn for_friendship(
        kind: EventKind,
        requester_id: i64,
        addressee_id: i64,
        subject_id: i64,
        user: UserDetails,
    ) -> Self {
        DomainEvent {
            kind,
            event_id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            aggregate_type: FRIENDSHIP_AGGREGATE.to_string(),
            aggregate_id: format!("{requester_id}-{addressee_id}"),
            subject_id,
            user,
            occurred_at: chrono::Utc::now(),
        }
    }

    /// Sent to the addressee, carrying the requester's details.
    pub fn friend_requested(requester: UserDetails, addressee_id: i64) -> Self {
        let requester_id = requester.id;
        Self::for_friendship(
            EventKind::FriendRequested,
            requester_id,
            addressee_id,
            addressee_id,
            requester,
        )
    }

    /// Sent to the requester, carrying the addressee's details.
    pub fn friend_request_accepted(requester_id: i64, addressee: UserDetails) -> Self {
        let addressee_id = addressee.id;
        Self::for_friendship(
            EventKind::FriendRequestAccepted,
            requester_id,
            addressee_id,
            requester_id,
            addressee,
        )
    }
}

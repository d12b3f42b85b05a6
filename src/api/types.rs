//! Response bodies of the JSON surface, one struct per shape, each built by
//! an explicit projection from store records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    identity::TokenPair,
    store::{rooms, Message, Room, Topic, User, UserRef},
    AppResult,
};

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: AccountView,
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: AccountView,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RoomView {
    pub id: Uuid,
    pub host: UserRef,
    pub topic: Option<String>,
    pub name: String,
    pub description: String,
    pub participants: Vec<UserRef>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: Uuid,
    pub user: UserRef,
    pub room: Uuid,
    pub room_name: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: RoomView,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub rooms: Vec<RoomView>,
    pub messages: Vec<MessageView>,
    pub topics: Vec<Topic>,
}

pub fn message_view(message: Message) -> MessageView {
    MessageView {
        id: message.id,
        user: message.user,
        room: message.room_id,
        room_name: message.room_name,
        body: message.body,
        created: message.created,
    }
}

/// Looks up the participants, which the room record does not carry.
pub async fn room_view(db_pool: &SqlitePool, room: Room) -> AppResult<RoomView> {
    let participants = rooms::participants(db_pool, room.id).await?;
    Ok(with_participants(room, participants))
}

fn with_participants(room: Room, participants: Vec<UserRef>) -> RoomView {
    RoomView {
        id: room.id,
        host: room.host,
        topic: room.topic,
        name: room.name,
        description: room.description,
        participants,
        created: room.created,
        updated: room.updated,
    }
}

pub async fn room_views(db_pool: &SqlitePool, rooms: Vec<Room>) -> AppResult<Vec<RoomView>> {
    let ids: Vec<_> = rooms.iter().map(|room| room.id).collect();
    let mut participants = rooms::participants_of(db_pool, &ids).await?;
    Ok(rooms
        .into_iter()
        .map(|room| {
            let people = participants.remove(&room.id).unwrap_or_default();
            with_participants(room, people)
        })
        .collect())
}

pub async fn room_detail(db_pool: &SqlitePool, room: Room, messages: Vec<Message>) -> AppResult<RoomDetail> {
    Ok(RoomDetail {
        room: room_view(db_pool, room).await?,
        messages: messages.into_iter().map(message_view).collect(),
    })
}

use crate::{
    access, include_res,
    res::{self, escape},
    store::{Message, User},
};

fn delete_link(message: &Message, viewer: Option<&User>) -> String {
    match viewer {
        Some(viewer) if access::can_modify(viewer.id, message.user.id) => {
            format!(r#"<a class="muted" href="/delete_message/{}">Delete</a>"#, message.id)
        }
        _ => String::new(),
    }
}

/// A message as it appears inside its room.
pub(crate) fn msg_to_html(message: &Message, viewer: Option<&User>) -> String {
    include_res!(str, "/pages/message.html")
        .replace("{id}", &message.id.to_string())
        .replace("{user_id}", &message.user.id.to_string())
        .replace("{username}", &escape(&message.user.username))
        .replace("{created}", &res::timestamp(message.created))
        .replace("{actions}", &delete_link(message, viewer))
        .replace("{body}", &res::markdown(&message.body))
}

/// A message as it appears in an activity feed, pointing back to its room.
pub(crate) fn activity_to_html(message: &Message, viewer: Option<&User>) -> String {
    include_res!(str, "/pages/activity_item.html")
        .replace("{user_id}", &message.user.id.to_string())
        .replace("{username}", &escape(&message.user.username))
        .replace("{created}", &res::timestamp(message.created))
        .replace("{room_id}", &message.room_id.to_string())
        .replace("{room_name}", &escape(&message.room_name))
        .replace("{actions}", &delete_link(message, viewer))
        .replace("{body}", &escape(&message.body))
}

pub(crate) fn activity_list(messages: &[Message], viewer: Option<&User>) -> String {
    if messages.is_empty() {
        return r#"<p class="muted">Nothing yet.</p>"#.to_owned();
    }
    messages.iter().map(|message| activity_to_html(message, viewer)).collect()
}

//! Shareable room links and `?room=` query prefill.
//!
//! The host's waiting screen offers a copyable link of the form
//! `<origin><path>?room=<code>`. On load, a `room` query parameter prefills
//! the join field; it never triggers an automatic join.

use crate::RoomCode;

/// Query parameter carrying the room code.
pub const ROOM_PARAM: &str = "room";

/// Build the shareable link for a room.
pub fn share_link(origin: &str, path: &str, code: &RoomCode) -> String {
    format!("{origin}{path}?{ROOM_PARAM}={code}")
}

/// Extract the `room` parameter from a URL query string, for prefill only.
///
/// Accepts the query with or without its leading `?`. Returns the raw value;
/// validation happens later, when the user actually joins. Room codes are
/// plain alphanumerics, so no percent-decoding is attempted.
pub fn room_from_query(query: &str) -> Option<&str> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == ROOM_PARAM)
        .map(|(_, value)| value)
}

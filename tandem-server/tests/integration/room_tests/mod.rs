mod test_room_recreated_after_empty;
mod test_single_peer_joins_room;
mod test_third_peer_rejected;

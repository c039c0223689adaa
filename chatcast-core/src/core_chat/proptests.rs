//! Property tests for identifier uniqueness and cascade deletes

use super::allocator::IdAllocator;
use super::bootstrap::{build_state, SeedData};
use super::types::{Attributes, EntityId};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    CreateChannel,
    CreateMessage(usize),
    DeleteChannel(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::CreateChannel),
        (0..8usize).prop_map(Op::CreateMessage),
        (0..8usize).prop_map(Op::DeleteChannel),
    ]
}

proptest! {
    // Property: no two entities ever share an id, even after deletes
    #[test]
    fn prop_ids_never_repeat(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut store = build_state(Arc::new(IdAllocator::new()), SeedData::default()).unwrap();
        let mut issued: HashSet<EntityId> = store.list_channels().iter().map(|c| c.id).collect();

        for op in ops {
            let channel_ids: Vec<EntityId> = store.list_channels().iter().map(|c| c.id).collect();
            match op {
                Op::CreateChannel => {
                    let channel = store.create_channel("p", true).unwrap();
                    prop_assert!(issued.insert(channel.id));
                }
                Op::CreateMessage(pick) => {
                    let target = channel_ids[pick % channel_ids.len()];
                    let message = store.create_message(target, Attributes::new()).unwrap();
                    prop_assert!(issued.insert(message.id));
                }
                Op::DeleteChannel(pick) => {
                    let target = channel_ids[pick % channel_ids.len()];
                    let _ = store.delete_channel(target);
                }
            }
        }
    }

    // Property: deleting a channel reports exactly the messages it held
    #[test]
    fn prop_cascade_is_exact(
        placements in prop::collection::vec(0..3usize, 0..30),
    ) {
        let mut store = build_state(Arc::new(IdAllocator::new()), SeedData::default()).unwrap();
        let doomed = store.create_channel("doomed", true).unwrap().id;
        let targets = [EntityId(1), EntityId(2), doomed];

        let mut expected = Vec::new();
        for pick in placements {
            let message = store.create_message(targets[pick], Attributes::new()).unwrap();
            if targets[pick] == doomed {
                expected.push(message.id);
            }
        }
        let survivors = store.messages().len() - expected.len();

        let deleted = store.delete_channel(doomed).unwrap();

        prop_assert_eq!(deleted.cascaded_message_ids, expected);
        prop_assert!(store.list_messages(doomed).is_empty());
        prop_assert_eq!(store.messages().len(), survivors);
        prop_assert!(store.messages().iter().all(|m| store.contains_channel(m.channel_id)));
    }
}

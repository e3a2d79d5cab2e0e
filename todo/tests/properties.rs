//! Property tests for sorting, filtering and persistence

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::sync::Arc;
use todo::filter::project;
use todo::sort::{bubble_sort_by, sort_by_text};
use todo::{CompletionMap, Config, Filter, TodoAction, TodoEngine, TodoId, TodoItem};
use todo_engine_testing::{InMemoryStorage, SequentialIdGenerator};

fn filter_strategy() -> impl Strategy<Value = Filter> {
    prop_oneof![Just(Filter::All), Just(Filter::Active), Just(Filter::Completed)]
}

// Small alphabet so equal texts show up often. Mixes ASCII, a BMP letter
// above the surrogate range and an astral emoji.
const TEXT: &str = "[abé\u{FF21}\u{1F600}]{0,3}";

// Texts as UTF-16 code units, ordered independently of `str`.
fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

fn items_strategy() -> impl Strategy<Value = Vec<TodoItem>> {
    prop::collection::vec(TEXT, 0..24).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| TodoItem::new(i.to_string(), text))
            .collect()
    })
}

fn action_strategy() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        TEXT.prop_map(|text| TodoAction::SetInputText { text }),
        Just(TodoAction::SubmitInput),
        (0u8..8, any::<bool>()).prop_map(|(id, completed)| TodoAction::SetCompletion {
            id: TodoId::from(id.to_string()),
            completed,
        }),
        filter_strategy().prop_map(|filter| TodoAction::SetFilter { filter }),
    ]
}

proptest! {
    #[test]
    fn sort_matches_std_stable_sort_on_utf16(items in items_strategy()) {
        let mut expected = items.clone();
        expected.sort_by_key(|item| utf16(&item.text));

        prop_assert_eq!(sort_by_text(&items), expected);
    }

    #[test]
    fn sort_is_a_permutation(values in prop::collection::vec(any::<i16>(), 0..64)) {
        let sorted = bubble_sort_by(&values, Ord::cmp);

        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn active_and_completed_partition_all(
        items in items_strategy(),
        flags in prop::collection::vec(prop::option::of(any::<bool>()), 24),
    ) {
        let mut completion = CompletionMap::default();
        for (item, flag) in items.iter().zip(&flags) {
            if let Some(completed) = flag {
                completion.set(item.id.clone(), *completed);
            }
        }

        let all = project(&items, &completion, Filter::All);
        let active = project(&items, &completion, Filter::Active);
        let completed = project(&items, &completion, Filter::Completed);

        prop_assert_eq!(all.len(), items.len());
        prop_assert_eq!(active.len() + completed.len(), all.len());
        prop_assert!(active.iter().all(|item| !completion.is_completed(&item.id)));
        prop_assert!(completed.iter().all(|item| completion.is_completed(&item.id)));

        // Each projection is a subsequence of the full list.
        for subset in [&active, &completed] {
            let mut rest = all.iter();
            prop_assert!(subset.iter().all(|item| rest.any(|candidate| std::ptr::eq(*candidate, *item))));
        }
    }

    #[test]
    fn list_stays_sorted_and_reloads_identically(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let storage = InMemoryStorage::new();
        let config = Config::default();
        let mut engine =
            TodoEngine::with_id_source(storage.clone(), &config, |_| Arc::new(SequentialIdGenerator::new())).unwrap();

        for action in actions {
            engine.send(action).unwrap();
            let items = &engine.state().items;
            prop_assert!(items.windows(2).all(|w| utf16(&w[0].text) <= utf16(&w[1].text)));
        }

        let reopened = TodoEngine::with_storage(storage, &config).unwrap();
        prop_assert_eq!(reopened.state(), engine.state());
    }

    #[test]
    fn set_filter_is_idempotent(
        actions in prop::collection::vec(action_strategy(), 0..20),
        filter in filter_strategy(),
    ) {
        let mut engine = TodoEngine::with_storage(InMemoryStorage::new(), &Config::default()).unwrap();
        for action in actions {
            engine.send(action).unwrap();
        }

        engine.set_filter(filter).unwrap();
        let once = engine.state().clone();
        engine.set_filter(filter).unwrap();

        prop_assert_eq!(engine.state(), &once);
    }
}

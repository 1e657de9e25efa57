//! Editor flow integration tests
//!
//! Drives the store through the modal controller the same way the terminal
//! host does, and checks the sequence invariants after every operation.

use std::collections::HashSet;

use proptest::prelude::*;
use stepmap::steps::{
    FlowStep, ModalCallbacks, ModalController, ModalState, RemoveOutcome, SaveRequest,
    SequenceDocument, StepId, StepStore,
};

/// Parent that applies modal commits straight to its store
struct Parent {
    store: StepStore,
    closes: usize,
}

impl ModalCallbacks for Parent {
    fn on_save(&mut self, request: SaveRequest) {
        match request {
            SaveRequest::Edit { id, text } => {
                self.store.edit(id, &text);
            }
            SaveRequest::Insert { anchor, text } => {
                self.store.insert_after(anchor, &text);
            }
        }
    }

    fn on_remove(&mut self, step_id: StepId) {
        self.store.remove(step_id);
    }

    fn on_close(&mut self) {
        self.closes += 1;
    }
}

fn parent(steps: Vec<FlowStep>) -> Parent {
    Parent {
        store: StepStore::from_steps(steps, None).unwrap(),
        closes: 0,
    }
}

fn snapshot(store: &StepStore) -> Vec<(u64, String, String)> {
    store
        .steps()
        .iter()
        .map(|s| (s.id.0, s.label.clone(), s.texto.clone()))
        .collect()
}

fn assert_invariants(store: &StepStore) {
    let mut ids = HashSet::new();
    for (index, step) in store.steps().iter().enumerate() {
        assert!(ids.insert(step.id), "duplicate id {}", step.id);
        assert_eq!(step.label, (index + 1).to_string());
        assert!(!step.texto.trim().is_empty());
    }
    if let Some(active) = store.active() {
        assert!(store.contains(active));
    }
}

#[test]
fn test_end_to_end_scenario() {
    let mut p = parent(vec![FlowStep::new(1, "Receber solicitação")]);
    let mut modal = ModalController::new();

    // Insert after id 1
    modal.open_insert(Some(StepId(1)));
    modal.set_draft("Aprovar");
    assert!(modal.save(&mut p));
    assert_eq!(
        snapshot(&p.store),
        vec![
            (1, "1".to_string(), "Receber solicitação".to_string()),
            (2, "2".to_string(), "Aprovar".to_string()),
        ]
    );

    // Edit id 1
    assert!(modal.open_edit(p.store.steps(), StepId(1)));
    modal.set_draft("Receber pedido");
    assert!(modal.save(&mut p));
    assert_eq!(p.store.get(StepId(1)).unwrap().texto, "Receber pedido");
    assert_eq!(p.store.get(StepId(1)).unwrap().label, "1");
    assert_eq!(p.store.get(StepId(2)).unwrap().label, "2");

    // Remove id 2 with two clicks
    assert!(modal.open_edit(p.store.steps(), StepId(2)));
    assert_eq!(
        modal.request_remove(&mut p),
        RemoveOutcome::AwaitingConfirmation
    );
    assert_eq!(p.store.len(), 2);
    assert_eq!(modal.request_remove(&mut p), RemoveOutcome::Removed(StepId(2)));

    assert_eq!(
        snapshot(&p.store),
        vec![(1, "1".to_string(), "Receber pedido".to_string())]
    );
    assert_eq!(modal.state(), ModalState::Closed);
    assert_eq!(p.closes, 3);
}

#[test]
fn test_insert_after_first_of_two() {
    let mut store =
        StepStore::from_steps(vec![FlowStep::new(1, "A"), FlowStep::new(2, "B")], None).unwrap();
    let new_id = store.insert_after(Some(StepId(1)), "x").unwrap();

    let order: Vec<StepId> = store.steps().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![StepId(1), new_id, StepId(2)]);
    assert_eq!(store.get(new_id).unwrap().label, "2");
    assert_eq!(store.get(StepId(2)).unwrap().label, "3");
}

#[test]
fn test_removing_active_step_clears_selection() {
    let mut p = parent(vec![FlowStep::new(1, "A"), FlowStep::new(2, "B")]);
    let mut modal = ModalController::new();

    p.store.set_active(Some(StepId(1)));
    modal.open_edit(p.store.steps(), StepId(1));
    modal.request_remove(&mut p);
    modal.request_remove(&mut p);

    assert_eq!(p.store.active(), None);
    assert_eq!(p.store.len(), 1);
}

#[test]
fn test_confirmation_never_leaks_into_next_session() {
    let mut p = parent(vec![FlowStep::new(1, "A")]);
    let mut modal = ModalController::new();

    modal.open_edit(p.store.steps(), StepId(1));
    modal.request_remove(&mut p);
    modal.open_insert(Some(StepId(1)));
    modal.cancel(&mut p);

    modal.open_edit(p.store.steps(), StepId(1));
    modal.request_remove(&mut p);
    assert_eq!(p.store.len(), 1, "one click after a fresh open must not delete");
}

#[test]
fn test_stale_session_after_removal_is_noop() {
    let mut p = parent(vec![FlowStep::new(1, "A"), FlowStep::new(2, "B")]);
    let mut modal = ModalController::new();

    modal.open_edit(p.store.steps(), StepId(2));
    modal.set_draft("changed");
    p.store.remove(StepId(2));

    assert!(modal.save(&mut p));
    assert_eq!(snapshot(&p.store), vec![(1, "1".to_string(), "A".to_string())]);
    assert_invariants(&p.store);
}

/// One store operation. Indices are taken modulo the current length.
#[derive(Debug, Clone)]
enum Op {
    Insert { anchor: Option<usize>, text: String },
    Remove(usize),
    Edit(usize, String),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (proptest::option::of(any::<usize>()), "[a-z]{1,12}")
            .prop_map(|(anchor, text)| Op::Insert { anchor, text }),
        1 => any::<usize>().prop_map(Op::Remove),
        // Spaces only are allowed so blank edits get exercised too
        1 => (any::<usize>(), "[a-z ]{0,12}").prop_map(|(index, text)| Op::Edit(index, text)),
    ]
}

fn pairs(store: &StepStore) -> Vec<(StepId, String)> {
    store
        .steps()
        .iter()
        .map(|s| (s.id, s.texto.clone()))
        .collect()
}

proptest! {
    #[test]
    fn test_operations_keep_ids_stable_and_labels_dense(
        ops in proptest::collection::vec(arb_op(), 0..60),
    ) {
        let mut store = StepStore::new();
        let mut last_issued: Option<StepId> = None;

        for op in ops {
            let before = pairs(&store);
            match op {
                Op::Insert { anchor, text } => {
                    let anchor_id = anchor
                        .filter(|_| !before.is_empty())
                        .map(|i| before[i % before.len()].0);
                    let Some(id) = store.insert_after(anchor_id, &text) else {
                        return Err(TestCaseError::fail("insert with text was ignored"));
                    };

                    if let Some(last) = last_issued {
                        prop_assert!(id > last, "id {} not above {}", id, last);
                    }
                    prop_assert!(before.iter().all(|(old, _)| *old != id));

                    let expected_pos = match anchor_id {
                        Some(a) => before.iter().position(|(old, _)| *old == a).map(|p| p + 1),
                        None => Some(0),
                    };
                    prop_assert_eq!(store.position(id), expected_pos);

                    // Everyone else keeps id, text and relative order
                    let others: Vec<(StepId, String)> =
                        pairs(&store).into_iter().filter(|(sid, _)| *sid != id).collect();
                    prop_assert_eq!(others, before);
                    last_issued = Some(id);
                }
                Op::Remove(index) => {
                    if before.is_empty() {
                        continue;
                    }
                    let target = before[index % before.len()].0;
                    let removed = store.remove(target).map(|s| s.id);
                    prop_assert_eq!(removed, Some(target));

                    let expected: Vec<(StepId, String)> =
                        before.into_iter().filter(|(sid, _)| *sid != target).collect();
                    prop_assert_eq!(pairs(&store), expected);
                }
                Op::Edit(index, text) => {
                    if before.is_empty() {
                        continue;
                    }
                    let target = before[index % before.len()].0;
                    let applied = store.edit(target, &text);
                    prop_assert_eq!(applied, !text.trim().is_empty());

                    let expected: Vec<(StepId, String)> = before
                        .into_iter()
                        .map(|(sid, old)| {
                            if sid == target && applied {
                                (sid, text.trim().to_string())
                            } else {
                                (sid, old)
                            }
                        })
                        .collect();
                    prop_assert_eq!(pairs(&store), expected);
                }
            }

            assert_invariants(&store);
        }
    }

    #[test]
    fn test_loaded_sequences_are_relabeled_and_seed_the_counter(
        ids in proptest::collection::btree_set(0u64..1_000_000, 0..30),
    ) {
        let steps: Vec<FlowStep> = ids
            .iter()
            .rev()
            .map(|id| FlowStep::new(*id, format!("step {id}")))
            .collect();
        let mut store = StepStore::from_steps(steps, None).unwrap();
        assert_invariants(&store);

        let before = store.steps().to_vec();
        store.relabel();
        prop_assert_eq!(store.steps(), before.as_slice());

        if let Some(max) = ids.iter().max() {
            prop_assert!(store.next_id() > StepId(*max));
        } else {
            prop_assert_eq!(store.next_id(), StepId(1));
        }
    }
}

#[test]
fn test_blank_commits_change_nothing() {
    let mut p = parent(vec![FlowStep::new(1, "A")]);
    let mut modal = ModalController::new();
    let before = snapshot(&p.store);

    modal.open_edit(p.store.steps(), StepId(1));
    modal.set_draft("   ");
    assert!(!modal.save(&mut p));
    modal.cancel(&mut p);

    modal.open_insert(Some(StepId(1)));
    modal.set_draft("");
    assert!(!modal.save(&mut p));

    assert_eq!(snapshot(&p.store), before);
    assert_eq!(p.store.revision(), 0);
}

#[test]
fn test_document_round_trip_preserves_identity() {
    let mut store = StepStore::new();
    let a = store.insert_after(None, "A").unwrap();
    let b = store.insert_after(Some(a), "B").unwrap();
    store.remove(a);

    let json = SequenceDocument::from_store(&store)
        .render(stepmap::steps::DocumentFormat::Json)
        .unwrap();
    let reloaded = SequenceDocument::parse(&json, stepmap::steps::DocumentFormat::Json)
        .unwrap()
        .into_store()
        .unwrap();

    assert_eq!(reloaded.steps()[0].id, b);
    assert_eq!(reloaded.steps()[0].label, "1");
    // Ids past the highest surviving one are never handed out again
    assert!(reloaded.next_id() > b);
}

//! Property tests for all-or-nothing mutation
//!
//! Each value is either a widget or something else; the container must
//! accept exactly the widget-only inputs and be untouched otherwise.

use crate::common::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Candidate {
    Widget(u32),
    Circle,
    Number(i64),
}

impl Candidate {
    fn boxed(&self) -> Box<dyn Element> {
        match self {
            Candidate::Widget(id) => Box::new(Widget::new(*id)),
            Candidate::Circle => Box::new(Circle { radius: 1.0 }),
            Candidate::Number(n) => Box::new(*n),
        }
    }

    fn is_widget(&self) -> bool {
        matches!(self, Candidate::Widget(_))
    }
}

fn candidate_strategy() -> impl Strategy<Value = Candidate> {
    prop_oneof![
        4 => any::<u32>().prop_map(Candidate::Widget),
        1 => Just(Candidate::Circle),
        1 => any::<i64>().prop_map(Candidate::Number),
    ]
}

proptest! {
    #[test]
    fn construct_accepts_only_all_widget_inputs(
        candidates in prop::collection::vec(candidate_strategy(), 0..16)
    ) {
        let dir = directory();
        let elements = candidates.iter().map(Candidate::boxed).collect();
        let result = TypedArray::<ArrayOfWidget>::with_elements(&dir, elements);
        let first_bad = candidates.iter().position(|c| !c.is_widget());

        match (result, first_bad) {
            (Ok(array), None) => prop_assert_eq!(array.len(), candidates.len()),
            (Err(Error::TypeMismatch { position, .. }), Some(pos)) => {
                prop_assert_eq!(position, Some(pos))
            }
            (other, expected) => {
                prop_assert!(false, "got {:?}, first bad {:?}", other.map(|a| a.len()), expected)
            }
        }
    }

    #[test]
    fn rejected_push_and_set_leave_contents_unchanged(
        initial in prop::collection::vec(any::<u32>(), 1..8),
        candidate in candidate_strategy(),
        index in 0usize..8,
    ) {
        let dir = directory();
        let mut array = widgets(&dir, &initial);

        let pushed = array.push_boxed(candidate.boxed());
        prop_assert_eq!(pushed.is_ok(), candidate.is_widget());
        if pushed.is_err() {
            prop_assert_eq!(ids(&array), initial.clone());
        }

        let before = ids(&array);
        let set = array.set_boxed(index, candidate.boxed());
        if set.is_err() {
            prop_assert_eq!(ids(&array), before);
        } else {
            prop_assert!(candidate.is_widget());
            prop_assert!(index <= before.len());
        }
    }

    #[test]
    fn replace_all_is_atomic(
        initial in prop::collection::vec(any::<u32>(), 0..8),
        replacement in prop::collection::vec(candidate_strategy(), 0..16),
    ) {
        let dir = directory();
        let mut array = widgets(&dir, &initial);
        let result = array.replace_all(replacement.iter().map(Candidate::boxed).collect());

        if replacement.iter().all(Candidate::is_widget) {
            let previous = result.unwrap();
            prop_assert_eq!(previous.len(), initial.len());
            prop_assert_eq!(array.len(), replacement.len());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(ids(&array), initial);
        }
    }
}

//! Validation on every mutating entry point
//!
//! A rejected value or collection must leave the container exactly as it
//! was: same length, same elements, same order.

use crate::common::*;

#[test]
fn construct_rejects_trailing_mismatch() {
    let dir = directory();
    let err = TypedArray::<ArrayOfWidget>::with_elements(
        &dir,
        vec![
            Box::new(Widget::new(1)) as Box<dyn Element>,
            Box::new(Widget::new(1)),
            Box::new(Circle { radius: 1.0 }),
        ],
    )
    .unwrap_err();
    match err {
        Error::TypeMismatch {
            expected,
            actual,
            operation,
            position,
            ..
        } => {
            assert_eq!(expected, "Widget");
            assert_eq!(actual, "Circle");
            assert_eq!(operation, Operation::Construct);
            assert_eq!(position, Some(2));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn construct_reports_unregistered_value_by_rust_name() {
    let dir = directory();
    let err = TypedArray::<ArrayOfWidget>::from_values(&dir, vec![7u64]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { ref actual, .. } if actual == "u64"));
}

#[test]
fn construct_empty() {
    let dir = directory();
    let array = TypedArray::<ArrayOfWidget>::with_elements(&dir, Vec::new()).unwrap();
    assert!(array.is_empty());
}

#[test]
fn append_rejection_keeps_state() {
    let dir = directory();
    let mut array = widgets(&dir, &[1, 2, 3]);
    let err = array.push(Square { side: 1.0 }).unwrap_err();
    assert_eq!(err.operation(), Some(Operation::Append));
    assert!(err.is_data_error());
    assert_eq!(ids(&array), vec![1, 2, 3]);
}

#[test]
fn set_rejection_keeps_state() {
    let dir = directory();
    let mut array = widgets(&dir, &[1, 2, 3]);
    let err = array.set(1, "two".to_string()).unwrap_err();
    assert_eq!(err.operation(), Some(Operation::SetAt(1)));
    assert_eq!(ids(&array), vec![1, 2, 3]);
}

#[test]
fn set_past_end_keeps_state() {
    let dir = directory();
    let mut array = widgets(&dir, &[1]);
    let err = array.set(3, Widget::new(9)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(ids(&array), vec![1]);
}

#[test]
fn boxed_entry_points_validate_concrete_type() {
    let dir = directory();
    let mut array = widgets(&dir, &[1]);
    array.push_boxed(Box::new(Widget::new(2))).unwrap();
    assert!(array.push_boxed(Box::new(Gadget { name: "g".into() })).is_err());
    array.set_boxed(0, Box::new(Widget::new(5))).unwrap();
    assert_eq!(ids(&array), vec![5, 2]);
}

#[test]
fn replace_all_rejection_keeps_state() {
    let dir = directory();
    let mut array = widgets(&dir, &[1, 2]);
    let replacement: Vec<Box<dyn Element>> = (10..20)
        .map(|id| Box::new(Widget::new(id)) as Box<dyn Element>)
        .chain(std::iter::once(Box::new(0i32) as Box<dyn Element>))
        .collect();
    let err = array.replace_all(replacement).unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch { operation: Operation::ReplaceAll, position: Some(10), .. }
    ));
    assert_eq!(ids(&array), vec![1, 2]);
}

#[test]
fn replace_all_hands_back_previous_contents() {
    let dir = directory();
    let mut array = widgets(&dir, &[1, 2]);
    let previous = array.replace_all_values(vec![Widget::new(3)]).unwrap();
    let previous: Vec<u32> = previous
        .iter()
        .map(|e| e.downcast_ref::<Widget>().unwrap().id)
        .collect();
    assert_eq!(previous, vec![1, 2]);
    assert_eq!(ids(&array), vec![3]);
}

#[test]
fn capability_kind_accepts_every_implementor() {
    let dir = directory();
    let mut shapes = TypedArray::<Shapes>::new(&dir).unwrap();
    shapes.push(Circle { radius: 1.0 }).unwrap();
    shapes.push(Square { side: 2.0 }).unwrap();
    let err = shapes.push(Widget::new(1)).unwrap_err();
    assert!(matches!(
        err,
        Error::TypeMismatch { ref expected, ref actual, .. } if expected == "Shape" && actual == "Widget"
    ));
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes.iter_as::<Circle>().count(), 1);
    assert_eq!(shapes.iter_as::<Square>().count(), 1);
}

#[test]
fn capability_implementors_added_later_are_accepted() {
    #[derive(Debug, Clone)]
    struct Triangle;

    let dir = directory();
    let mut shapes = TypedArray::<Shapes>::new(&dir).unwrap();
    assert!(shapes.push(Triangle).is_err());
    dir.register::<Triangle>("Triangle").unwrap();
    dir.implement::<Triangle>("Shape").unwrap();
    shapes.push(Triangle).unwrap();
    assert_eq!(shapes.len(), 1);
}

#[test]
fn every_element_conforms_after_mixed_operations() {
    let dir = directory();
    let mut array = widgets(&dir, &[1]);
    let _ = array.push(Widget::new(2));
    let _ = array.push(1u8);
    let _ = array.set(0, Circle { radius: 0.5 });
    let _ = array.set(1, Widget::new(20));
    let _ = array.replace_all(vec![Box::new(Gadget { name: "x".into() }) as Box<dyn Element>]);
    for element in &array {
        assert!(dir.conforms(array.target(), element));
    }
    assert_eq!(ids(&array), vec![1, 20]);
}

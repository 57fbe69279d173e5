//! End-to-end container scenarios

use crate::common::*;

#[test]
fn container_of_widget() {
    let dir = container_of_directory();
    let mut container = TypedArray::<ContainerOfWidget>::from_values(
        &dir,
        vec![Widget::new(1), Widget::new(2)],
    )
    .unwrap();
    assert_eq!(ids(&container), vec![1, 2]);

    let err = container.push(Gadget { name: "not a widget".into() }).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert_eq!(ids(&container), vec![1, 2]);

    container.set(0, Widget::new(3)).unwrap();
    assert_eq!(ids(&container), vec![3, 2]);
}

#[test]
fn container_of_gadget_never_constructs() {
    let dir = container_of_directory();
    for _ in 0..3 {
        assert!(matches!(
            TypedArray::<ContainerOfGadget>::new(&dir),
            Err(Error::UnresolvableTargetType { .. })
        ));
        assert!(matches!(
            TypedArray::<ContainerOfGadget>::from_values(&dir, vec![Gadget { name: "g".into() }]),
            Err(Error::UnresolvableTargetType { .. })
        ));
    }
}

#[test]
fn cloned_container_shares_directory_not_elements() {
    let dir = directory();
    let original = widgets(&dir, &[1, 2]);
    let mut copy = original.clone();
    copy.set(0, Widget::new(9)).unwrap();
    assert_eq!(ids(&original), vec![1, 2]);
    assert_eq!(ids(&copy), vec![9, 2]);
    assert!(std::sync::Arc::ptr_eq(original.directory(), copy.directory()));
}

#[test]
fn into_elements_downcasts_back() {
    let dir = directory();
    let array = widgets(&dir, &[4, 5]);
    let owned: Vec<Widget> = array
        .into_elements()
        .into_iter()
        .map(|e| *e.downcast::<Widget>().unwrap())
        .collect();
    assert_eq!(owned, vec![Widget::new(4), Widget::new(5)]);
}

use super::*;

#[test]
fn notifies_subscribers_in_registration_order() {
    let observable = Observable::<u32>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let seen = Rc::clone(&seen);
        observable.subscribe(move |value| seen.borrow_mut().push(format!("{name}:{value}")));
    }

    observable.notify(&7);
    assert_eq!(*seen.borrow(), ["first:7", "second:7", "third:7"]);
}

#[test]
fn unsubscribed_callbacks_are_not_invoked() {
    let observable = Observable::<u32>::new();
    let hits = Rc::new(Cell::new(0));

    let counter = Rc::clone(&hits);
    let id = observable.subscribe(move |_| counter.set(counter.get() + 1));

    observable.notify(&1);
    assert!(observable.unsubscribe(id));
    assert!(!observable.unsubscribe(id));
    observable.notify(&2);

    assert_eq!(hits.get(), 1);
    assert_eq!(observable.subscriber_count(), 0);
}

#[test]
fn subscriber_may_unsubscribe_itself_during_delivery() {
    let observable = Rc::new(Observable::<u32>::new());
    let own_id = Rc::new(Cell::new(None));
    let hits = Rc::new(Cell::new(0));

    let id = {
        let publisher = Rc::clone(&observable);
        let own_id = Rc::clone(&own_id);
        let hits = Rc::clone(&hits);
        observable.subscribe(move |_| {
            hits.set(hits.get() + 1);
            if let Some(id) = own_id.get() {
                publisher.unsubscribe(id);
            }
        })
    };
    own_id.set(Some(id));

    observable.notify(&1);
    observable.notify(&2);
    assert_eq!(hits.get(), 1);
}

#[test]
fn subscription_added_during_delivery_starts_with_next_notify() {
    let observable = Rc::new(Observable::<u32>::new());
    let late_hits = Rc::new(Cell::new(0));

    {
        let observable_for_cb = Rc::clone(&observable);
        let late_hits = Rc::clone(&late_hits);
        let added = Cell::new(false);
        observable.subscribe(move |_| {
            if !added.replace(true) {
                let late_hits = Rc::clone(&late_hits);
                observable_for_cb.subscribe(move |_| late_hits.set(late_hits.get() + 1));
            }
        });
    }

    observable.notify(&1);
    assert_eq!(late_hits.get(), 0);
    observable.notify(&2);
    assert_eq!(late_hits.get(), 1);
}

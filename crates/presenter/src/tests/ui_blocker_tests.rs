use std::rc::Rc;

use super::*;
use crate::test_support::RecordingIndicator;

fn blocker() -> (UiBlocker, Rc<RecordingIndicator>) {
    let indicator = Rc::new(RecordingIndicator::default());
    (UiBlocker::new(TimeLimit::default(), indicator.clone()), indicator)
}

#[tokio::test(start_paused = true)]
async fn fast_action_never_shows_the_indicator() {
    let (blocker, indicator) = blocker();

    let output = blocker
        .run(async {
            sleep(Duration::from_millis(100)).await;
            7
        })
        .await
        .expect("gate free");

    assert_eq!(output, 7);
    assert!(indicator.names().is_empty());
    assert!(!blocker.is_blocked());
}

#[tokio::test(start_paused = true)]
async fn shown_indicator_stays_until_the_upper_bound() {
    let (blocker, indicator) = blocker();
    let started = Instant::now();

    blocker
        .run(sleep(Duration::from_millis(500)))
        .await
        .expect("gate free");

    let events = indicator.events.borrow().clone();
    assert_eq!(
        events.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        ["show", "hide"]
    );
    assert_eq!(events[0].1 - started, DEFAULT_LOWER_LIMIT);
    assert_eq!(events[1].1 - started, DEFAULT_UPPER_LIMIT);
}

#[tokio::test(start_paused = true)]
async fn slow_action_hides_as_soon_as_it_resolves() {
    let (blocker, indicator) = blocker();
    let started = Instant::now();

    blocker
        .run(sleep(Duration::from_millis(1500)))
        .await
        .expect("gate free");

    let events = indicator.events.borrow().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].1 - started, Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn second_block_is_rejected_while_held() {
    let (blocker, _indicator) = blocker();

    let guard = blocker.block().expect("first");
    assert!(blocker.is_blocked());
    assert_eq!(blocker.block().err(), Some(GateBusy));
    assert_eq!(blocker.run(async {}).await.err(), Some(GateBusy));

    guard.unblock().await;
    assert!(blocker.block().is_ok());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_guard_hides_immediately() {
    let (blocker, indicator) = blocker();

    {
        let guard = blocker.block().expect("gate free");
        guard.cover(sleep(Duration::from_millis(400))).await;
        assert_eq!(indicator.names(), ["show"]);
    }

    assert_eq!(indicator.names(), ["show", "hide"]);
    assert!(!blocker.is_blocked());
}

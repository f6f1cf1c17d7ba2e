use super::*;
use crate::test_support::{context, day, RecordingButton, SurfaceOp};
use shared::error::DraftError;

fn presenter() -> (
    NewPointPresenter,
    Rc<crate::test_support::RecordingSurface>,
    Rc<RecordingButton>,
) {
    let (ctx, surface) = context();
    let button = Rc::new(RecordingButton::default());
    (NewPointPresenter::new(ctx, button.clone()), surface, button)
}

#[test]
fn init_is_idempotent_and_disables_the_button() {
    let (mut presenter, surface, button) = presenter();

    assert_eq!(presenter.init(day(1, 8)), None);
    assert_eq!(presenter.init(day(2, 8)), None);

    assert_eq!(
        surface.ops(),
        [SurfaceOp::Mount(Slot::NewPoint, Position::Start)]
    );
    assert!(button.is_disabled());
    assert!(presenter.ctx.editor.is_held_by(&EditorId::NewPoint));
    let form = surface.form(&Slot::NewPoint).expect("form");
    assert!(form.is_new);
    assert_eq!(form.draft.date_from, day(1, 8));
}

#[test]
fn destroy_reenables_the_button_and_releases_the_token() {
    let (mut presenter, surface, button) = presenter();
    presenter.init(day(1, 8));

    presenter.destroy();
    presenter.destroy();

    assert!(!button.is_disabled());
    assert_eq!(*button.states.borrow(), [true, false]);
    assert!(!surface.is_mounted(&Slot::NewPoint));
    assert_eq!(presenter.ctx.editor.holder(), None);
}

#[test]
fn submit_requires_a_destination() {
    let (mut presenter, _surface, _button) = presenter();
    presenter.init(day(1, 8));

    assert_eq!(
        presenter.submit(),
        Err(FormError::Draft(DraftError::MissingDestination))
    );

    presenter
        .edit(DraftChange::Destination("Geneva".into()))
        .expect("destination");
    presenter.edit(DraftChange::BasePrice(40)).expect("price");
    match presenter.submit().expect("submit") {
        ViewAction::Add { update, draft } => {
            assert_eq!(update, UpdateType::Minor);
            assert_eq!(draft.base_price, 40);
            assert_eq!(draft.id, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn closed_presenter_rejects_edits() {
    let (mut presenter, _surface, _button) = presenter();

    assert_eq!(
        presenter.edit(DraftChange::BasePrice(1)),
        Err(FormError::Closed)
    );
    assert_eq!(presenter.submit(), Err(FormError::Closed));
}

#[test]
fn aborting_reenables_and_shakes_the_form() {
    let (mut presenter, surface, _button) = presenter();
    presenter.init(day(1, 8));
    surface.clear_ops();

    presenter.set_saving();
    presenter.set_aborting();

    assert_eq!(
        surface.ops(),
        [
            SurfaceOp::UpdateForm(Slot::NewPoint, FormState::saving()),
            SurfaceOp::UpdateForm(Slot::NewPoint, FormState::default()),
            SurfaceOp::Shake(Slot::NewPoint),
        ]
    );
}

use copydesk_core::{
    update, AppState, Effect, Msg, NotificationStore, ToastKind, TOAST_AUTO_DISMISS,
};

#[test]
fn ids_are_strictly_increasing() {
    let mut store = NotificationStore::new();
    let a = store.push(ToastKind::Info, "a");
    let b = store.push(ToastKind::Error, "b");
    store.dismiss(a);
    let c = store.push(ToastKind::Success, "c");

    assert!(a < b && b < c);
    assert_eq!(store.toasts().len(), 2);
}

#[test]
fn dismissing_twice_reports_false() {
    let mut store = NotificationStore::new();
    let id = store.push(ToastKind::Info, "hello");
    assert!(store.dismiss(id));
    assert!(!store.dismiss(id));
}

#[test]
fn validation_toast_schedules_auto_dismiss() {
    let (state, effects) = update(AppState::new(), Msg::GenerateTitlesClicked);

    let toast = state.toasts().toasts().last().cloned().expect("toast");
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(
        effects,
        vec![Effect::ScheduleToastDismiss {
            id: toast.id,
            after: TOAST_AUTO_DISMISS,
        }]
    );

    let (state, effects) = update(state, Msg::ToastExpired(toast.id));
    assert!(state.toasts().toasts().is_empty());
    assert!(effects.is_empty());

    // Expiring something already gone changes nothing.
    let (next, effects) = update(state.clone(), Msg::ToastExpired(toast.id));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn explicit_dismiss_cancels_the_timer() {
    let (state, _) = update(AppState::new(), Msg::GenerateTitlesClicked);
    let id = state.toasts().last_id();

    let (state, effects) = update(state, Msg::ToastDismissed(id));
    assert!(state.toasts().get(id).is_none());
    assert_eq!(effects, vec![Effect::CancelToastDismiss { id }]);
}

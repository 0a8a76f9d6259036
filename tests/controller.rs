//! End-to-end behavior of the picker controller, driven the way the plugin
//! drives it: events in, actions out, raw web responses routed back through
//! their request context.

use chart_picker::app::{ControllerOptions, PickerController, ViewState};
use chart_picker::catalog::{CatalogClient, CatalogRequest, RequestKind};
use chart_picker::infrastructure::CacheBuster;
use chart_picker::storage::BlockAttributes;
use chart_picker::worker::{WorkerMessage, WorkerResponse};
use chart_picker::{Action, Event, ItemId};
use serde_json::json;

const API: &str = "https://x.test/wp-json";

fn controller_with(options: ControllerOptions) -> PickerController {
    PickerController::new(CatalogClient::new(API), options, CacheBuster::new(42))
}

fn controller() -> PickerController {
    controller_with(ControllerOptions::default())
}

fn fetches(actions: &[Action]) -> Vec<CatalogRequest> {
    actions.iter().filter_map(Action::as_fetch).cloned().collect()
}

fn respond(controller: &mut PickerController, request: &CatalogRequest, status: u16, body: serde_json::Value) -> bool {
    let event = Event::WebResponse {
        status,
        body: body.to_string().into_bytes(),
        context: request.context.clone(),
    };
    controller.handle_event(&event, 0).unwrap().0
}

/// Initializes and answers both mount requests.
fn mounted(max_available: u64, catalog: serde_json::Value) -> PickerController {
    let mut controller = controller();
    let (_, actions) = controller.handle_event(&Event::Initialize, 0).unwrap();
    let requests = fetches(&actions);

    respond(
        &mut controller,
        &requests[0],
        200,
        json!({"image_support_active": true, "siteurl": "https://x.test", "maxAvailable": max_available}),
    );
    respond(&mut controller, &requests[1], 200, catalog);
    controller
}

#[test]
fn mount_issues_probe_catalog_and_attribute_load() {
    let mut controller = controller();
    let (should_render, actions) = controller.handle_event(&Event::Initialize, 0).unwrap();
    assert!(should_render);

    let requests = fetches(&actions);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].kind, RequestKind::Capabilities);
    assert_eq!(requests[1].kind, RequestKind::Catalog { token: 1 });
    assert_eq!(requests[1].url, format!("{API}/catalog/v1/items/"));
    assert!(actions.iter().any(|a| matches!(
        a,
        Action::PostToWorker(WorkerMessage::LoadAttributes { block_id, .. }) if block_id == "default"
    )));

    assert_eq!(controller.handle_event(&Event::Initialize, 0).unwrap(), (false, vec![]));
}

#[test]
fn initial_load_shows_browsing_with_count() {
    let controller = mounted(5, json!([5, [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]]));

    let state = controller.state();
    assert_eq!(state.view_state(), ViewState::Browsing);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.count_label(), "2 of 5");
    assert_eq!(controller.new_chart_link().as_deref(), Some("https://x.test/create?type=chart"));
}

#[test]
fn missing_route_shows_error_until_next_success() {
    let mut controller = controller();
    let (_, actions) = controller.handle_event(&Event::Initialize, 0).unwrap();
    let requests = fetches(&actions);

    respond(
        &mut controller,
        &requests[1],
        404,
        json!({"code": "rest_no_route", "message": "No route was found"}),
    );
    assert_eq!(controller.state().view_state(), ViewState::Error);

    // Typing does not leave the error state by itself.
    controller.handle_event(&Event::Search("ab".to_string()), 0).unwrap();
    assert_eq!(controller.state().view_state(), ViewState::Error);

    let (_, actions) = controller.handle_event(&Event::Retry, 10).unwrap();
    let retry = fetches(&actions);
    assert_eq!(retry.len(), 1);
    assert!(retry[0].url.ends_with("/catalog/v1/items/ab"));

    respond(&mut controller, &retry[0], 200, json!([1, [{"id": 9, "title": "ab chart"}]]));
    assert_ne!(controller.state().view_state(), ViewState::Error);
    assert!(controller.state().loaded);
}

#[test]
fn empty_catalog_ignores_search_text() {
    let mut controller = mounted(0, json!([0, []]));
    assert_eq!(controller.state().view_state(), ViewState::EmptyCatalog);

    for text in ["x", "longer search"] {
        controller.handle_event(&Event::Search(text.to_string()), 0).unwrap();
        assert_eq!(controller.state().view_state(), ViewState::EmptyCatalog);
    }
}

#[test]
fn typing_fires_one_debounced_fetch_with_latest_text() {
    let mut controller = mounted(5, json!([5, []]));

    let mut wakes = Vec::new();
    for (c, at) in [('a', 0), ('b', 100), ('c', 200)] {
        let (_, actions) = controller.handle_event(&Event::Char(c), at).unwrap();
        assert!(fetches(&actions).is_empty());
        wakes.extend(actions.into_iter().filter_map(|a| match a {
            Action::ScheduleWake { delay_ms } => Some(at + delay_ms),
            _ => None,
        }));
    }
    assert_eq!(controller.state().search_text, "abc");
    assert_eq!(wakes, vec![500, 600, 700]);

    let mut fired = Vec::new();
    for at in wakes {
        let (_, actions) = controller.handle_event(&Event::Tick, at).unwrap();
        fired.extend(fetches(&actions).into_iter().map(|r| (at, r)));
    }

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0, 700);
    assert!(fired[0].1.url.ends_with("/catalog/v1/items/abc"));
}

#[test]
fn search_text_is_sanitized_before_display_and_fetch() {
    let mut controller = mounted(5, json!([5, []]));
    let (_, actions) = controller
        .handle_event(&Event::Search("Q1/Q2 <b>sales</b>!".to_string()), 0)
        .unwrap();
    assert_eq!(controller.state().search_text, "Q1Q2 bsalesb");

    let Some(Action::ScheduleWake { delay_ms }) = actions.first() else {
        panic!("expected a wake-up, got {actions:?}");
    };
    let (_, actions) = controller.handle_event(&Event::Tick, *delay_ms).unwrap();
    assert!(fetches(&actions)[0].url.ends_with("/catalog/v1/items/Q1Q2%20bsalesb"));
}

#[test]
fn selection_survives_a_search_that_excludes_it() {
    let mut controller = mounted(5, json!([2, [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]]));

    controller.handle_event(&Event::CursorDown, 0).unwrap();
    let (_, actions) = controller.handle_event(&Event::SelectHighlighted, 0).unwrap();
    assert!(actions.iter().any(|a| matches!(
        a,
        Action::PostToWorker(WorkerMessage::SetAttributes { chart_id: Some(ItemId::Int(2)), .. })
    )));
    assert_eq!(controller.state().view_state(), ViewState::Selected);

    controller.handle_event(&Event::Search("zz".to_string()), 0).unwrap();
    let (_, actions) = controller.handle_event(&Event::Tick, 500).unwrap();
    respond(&mut controller, &fetches(&actions)[0], 200, json!([0, []]));

    let state = controller.state();
    assert_eq!(state.selected_id, Some(ItemId::Int(2)));
    assert_eq!(state.selected_item(), None);
    assert_eq!(state.view_state(), ViewState::Selected);
    assert_eq!(controller.edit_chart_link().as_deref(), Some("https://x.test/edit?id=2"));
}

#[test]
fn clearing_selection_keeps_items_and_persists_none() {
    let mut controller = mounted(5, json!([1, [{"id": "c-1", "title": "A"}]]));
    controller
        .handle_event(&Event::Select(Some(ItemId::from("c-1"))), 0)
        .unwrap();

    let (_, actions) = controller.handle_event(&Event::ClearSelection, 0).unwrap();
    assert!(actions.iter().any(|a| matches!(
        a,
        Action::PostToWorker(WorkerMessage::SetAttributes { chart_id: None, .. })
    )));
    assert_eq!(controller.state().view_state(), ViewState::Browsing);
    assert_eq!(controller.state().items.len(), 1);

    // A blank id clears too.
    controller.handle_event(&Event::Select(Some(ItemId::from(""))), 0).unwrap();
    assert_eq!(controller.state().selected_id, None);
}

#[test]
fn slow_earlier_search_does_not_overwrite_newer_results() {
    let mut controller = mounted(5, json!([5, []]));

    controller.handle_event(&Event::Search("old".to_string()), 0).unwrap();
    let (_, first) = controller.handle_event(&Event::Tick, 500).unwrap();
    controller.handle_event(&Event::Search("new".to_string()), 600).unwrap();
    let (_, second) = controller.handle_event(&Event::Tick, 1100).unwrap();

    let (first, second) = (&fetches(&first)[0], &fetches(&second)[0]);
    assert!(respond(&mut controller, second, 200, json!([1, [{"id": 2, "title": "new"}]])));
    assert!(!respond(&mut controller, first, 200, json!([1, [{"id": 1, "title": "old"}]])));

    assert_eq!(controller.state().items[0].title, "new");
}

#[test]
fn non_route_failures_follow_the_error_policy() {
    let failing = |options: ControllerOptions| {
        let mut controller = controller_with(options);
        let (_, actions) = controller.handle_event(&Event::Initialize, 0).unwrap();
        respond(&mut controller, &fetches(&actions)[1], 500, json!({"code": "internal"}));
        controller.state().view_state()
    };

    assert_eq!(failing(ControllerOptions::default()), ViewState::Error);
    assert_eq!(
        failing(ControllerOptions {
            strict_fetch_errors: false,
            ..ControllerOptions::default()
        }),
        ViewState::Loading
    );
}

#[test]
fn failed_capability_probe_keeps_defaults() {
    let mut controller = controller();
    let (_, actions) = controller.handle_event(&Event::Initialize, 0).unwrap();
    let requests = fetches(&actions);

    assert!(!respond(&mut controller, &requests[0], 0, json!("connection refused")));
    respond(&mut controller, &requests[1], 200, json!([0, []]));

    let state = controller.state();
    assert!(state.image_support_enabled);
    assert_eq!(state.origin_url, None);
    assert_eq!(state.view_state(), ViewState::EmptyCatalog);
    assert_eq!(controller.new_chart_link(), None);
}

#[test]
fn stored_attributes_restore_selection_once() {
    let mut controller = mounted(5, json!([1, [{"id": 3, "title": "C"}]]));
    let stored = WorkerResponse::AttributesLoaded {
        block_id: "default".to_string(),
        attributes: Some(BlockAttributes::new(Some(ItemId::Int(3)))),
    };

    assert!(controller.handle_event(&Event::WorkerResponse(stored.clone()), 0).unwrap().0);
    assert_eq!(controller.state().view_state(), ViewState::Selected);

    controller.handle_event(&Event::ClearSelection, 0).unwrap();
    assert!(!controller.handle_event(&Event::WorkerResponse(stored), 0).unwrap().0);
    assert_eq!(controller.state().selected_id, None);
}

#[test]
fn late_attributes_never_override_user_choice() {
    let mut controller = mounted(5, json!([2, [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]]));
    controller.handle_event(&Event::Select(Some(ItemId::Int(1))), 0).unwrap();

    let stored = WorkerResponse::AttributesLoaded {
        block_id: "default".to_string(),
        attributes: Some(BlockAttributes::new(Some(ItemId::Int(2)))),
    };
    controller.handle_event(&Event::WorkerResponse(stored), 0).unwrap();
    assert_eq!(controller.state().selected_id, Some(ItemId::Int(1)));
}

#[test]
fn links_open_through_actions() {
    let mut controller = mounted(5, json!([1, [{"id": 4, "title": "D"}]]));

    let (_, actions) = controller.handle_event(&Event::OpenNewChart, 0).unwrap();
    assert_eq!(
        actions,
        vec![Action::OpenUrl {
            url: "https://x.test/create?type=chart".to_string()
        }]
    );

    assert!(controller.handle_event(&Event::OpenEditChart, 0).unwrap().1.is_empty());

    let (_, actions) = controller.handle_event(&Event::CloseFocus, 0).unwrap();
    assert_eq!(actions, vec![Action::CloseFocus]);
}

#[test]
fn foreign_web_responses_are_ignored() {
    let mut controller = mounted(5, json!([1, [{"id": 4, "title": "D"}]]));
    let before = controller.state().clone();

    let event = Event::WebResponse {
        status: 200,
        body: b"[]".to_vec(),
        context: std::collections::BTreeMap::new(),
    };
    assert_eq!(controller.handle_event(&event, 0).unwrap(), (false, vec![]));
    assert_eq!(controller.state(), &before);
}

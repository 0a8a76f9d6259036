//! Selection persistence through the worker and the JSON attribute store,
//! across a remount of the picker.

use chart_picker::app::{ControllerOptions, PickerController, ViewState};
use chart_picker::catalog::{CatalogClient, CatalogPage};
use chart_picker::infrastructure::CacheBuster;
use chart_picker::storage::{JsonStorage, Storage};
use chart_picker::worker::{PickerWorker, WorkerMessage, WorkerResponse, ATTRIBUTES_FILE};
use chart_picker::{Action, CatalogItem, Event, ItemId};
use std::path::Path;

fn controller(block_id: &str) -> PickerController {
    let options = ControllerOptions {
        block_id: block_id.to_string(),
        ..ControllerOptions::default()
    };
    let mut controller = PickerController::new(CatalogClient::new("https://x.test"), options, CacheBuster::new(1));
    controller.apply_catalog(
        1,
        Ok(CatalogPage {
            total_available: 2,
            items: vec![CatalogItem::new(1, "A"), CatalogItem::new(2, "B")],
        }),
    );
    controller
}

fn worker(path: &Path) -> PickerWorker {
    PickerWorker::with_storage(Box::new(JsonStorage::new(path.to_path_buf()).unwrap()))
}

/// Runs every worker message in `actions` and feeds the replies back.
fn pump(controller: &mut PickerController, worker: &mut PickerWorker, actions: Vec<Action>) {
    for action in actions {
        if let Action::PostToWorker(message) = action {
            // Messages cross the thread boundary as JSON.
            let payload = serde_json::to_string(&message).unwrap();
            let reply = worker.on_payload(&payload).unwrap();
            let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
            controller.handle_event(&Event::WorkerResponse(response), 0).unwrap();
        }
    }
}

#[test]
fn selection_is_restored_after_remount() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ATTRIBUTES_FILE);

    {
        let mut picker = controller("block-1");
        let mut worker = worker(&path);
        let (_, actions) = picker.handle_event(&Event::Select(Some(ItemId::Int(2))), 0).unwrap();
        pump(&mut picker, &mut worker, actions);
    }

    let mut picker = controller("block-1");
    let mut worker = worker(&path);
    let actions = picker.initialize();
    pump(&mut picker, &mut worker, actions);

    assert_eq!(picker.state().selected_id, Some(ItemId::Int(2)));
    assert_eq!(picker.state().view_state(), ViewState::Selected);
}

#[test]
fn blocks_do_not_share_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ATTRIBUTES_FILE);

    {
        let mut picker = controller("block-1");
        let mut worker = worker(&path);
        let (_, actions) = picker.handle_event(&Event::Select(Some(ItemId::Int(1))), 0).unwrap();
        pump(&mut picker, &mut worker, actions);
    }

    let mut other = controller("block-2");
    let mut worker = worker(&path);
    let actions = other.initialize();
    pump(&mut other, &mut worker, actions);
    assert_eq!(other.state().selected_id, None);

    let storage = JsonStorage::new(path).unwrap();
    assert_eq!(storage.get_attributes("block-2").unwrap(), None);
    let stored = storage.get_attributes("block-1").unwrap().unwrap();
    assert_eq!(stored.chart_id, Some(ItemId::Int(1)));
}

#[test]
fn cleared_selection_is_persisted_as_absent_chart_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ATTRIBUTES_FILE);
    let mut picker = controller("b");
    let mut worker = worker(&path);

    let (_, actions) = picker.handle_event(&Event::Select(Some(ItemId::Int(1))), 0).unwrap();
    pump(&mut picker, &mut worker, actions);
    let (_, actions) = picker.handle_event(&Event::ClearSelection, 0).unwrap();
    pump(&mut picker, &mut worker, actions);

    let stored = worker.handle_message(WorkerMessage::load_attributes("b".to_string()));
    let WorkerResponse::AttributesLoaded { attributes: Some(attributes), .. } = stored else {
        panic!("expected stored attributes, got {stored:?}");
    };
    assert_eq!(attributes.chart_id, None);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("chartId"));
}

//! App flow tests: keys in, equation out

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use common::{alien, aliens, movie, predator, pump, FakeService};
use moviemaths::app::{App, AppEvent};
use moviemaths::models::{Operator, ResultSlot, SearchCache, Slot};
use moviemaths::search::DEFAULT_DEBOUNCE;

fn app(service: FakeService) -> (App, UnboundedReceiver<AppEvent>) {
    let (tx, rx) = unbounded_channel();
    let app = App::new(
        Arc::new(service),
        Arc::new(SearchCache::new()),
        DEFAULT_DEBOUNCE,
        tx,
    );
    (app, rx)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

async fn settle(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
    pump(rx, Duration::from_secs(1), |event| app.handle_event(event)).await;
}

fn service() -> FakeService {
    FakeService::new()
        .with_search("alien", 10, vec![alien(), aliens()])
        .with_search("predator", 10, vec![predator()])
        .with_poster("Alien", "http://img/alien.jpg")
        .with_answer(
            Operator::Add,
            &alien().id,
            &predator().id,
            10,
            &movie("tt0370263", "AVP: Alien vs. Predator", "2004"),
        )
        .with_answer(
            Operator::Subtract,
            &alien().id,
            &predator().id,
            10,
            &movie("tt1446714", "Prometheus", "2012"),
        )
}

#[tokio::test(start_paused = true)]
async fn test_search_select_and_compute() {
    let (mut app, mut rx) = app(service());

    type_text(&mut app, "alien");
    settle(&mut app, &mut rx).await;
    assert_eq!(app.operand_box(Slot::First).search.candidates().len(), 2);

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.engine.operand(Slot::First), Some(&alien()));
    assert!(app.result().is_empty());

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Slot::Second);
    type_text(&mut app, "predator");
    settle(&mut app, &mut rx).await;
    app.handle_key(key(KeyCode::Enter));

    settle(&mut app, &mut rx).await;
    assert_eq!(
        app.result().movie().map(|m| m.title.as_str()),
        Some("AVP: Alien vs. Predator")
    );

    // The poster for the first operand arrived without a recompute
    assert_eq!(
        app.engine.operand(Slot::First).and_then(|m| m.image.as_deref()),
        Some("http://img/alien.jpg")
    );
}

#[tokio::test(start_paused = true)]
async fn test_arrow_keys_pick_candidate() {
    let (mut app, mut rx) = app(service());

    type_text(&mut app, "alien");
    settle(&mut app, &mut rx).await;
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.engine.operand(Slot::First), Some(&aliens()));
}

#[tokio::test(start_paused = true)]
async fn test_operator_keys_and_clear() {
    let (mut app, mut rx) = app(service());
    app.prefill(Slot::First, alien());
    app.prefill(Slot::Second, predator());
    settle(&mut app, &mut rx).await;

    app.handle_key(ctrl('o'));
    settle(&mut app, &mut rx).await;
    assert_eq!(app.engine.operator(), Operator::Subtract);
    assert_eq!(
        app.result().movie().map(|m| m.title.as_str()),
        Some("Prometheus")
    );

    app.handle_key(key(KeyCode::Char('+')));
    assert_eq!(app.engine.operator(), Operator::Add);

    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.engine.operand(Slot::First), None);
    assert_eq!(app.result(), &ResultSlot::Empty);
    assert!(app.is_editing());
}

#[tokio::test(start_paused = true)]
async fn test_ctrl_keys_are_not_typed() {
    let (mut app, _rx) = app(service());

    app.handle_key(ctrl('o'));
    assert_eq!(app.operand_box(Slot::First).search.value(), "");
    assert_eq!(app.engine.operator(), Operator::Subtract);

    app.handle_key(ctrl('c'));
    assert!(!app.running);
}

#[tokio::test(start_paused = true)]
async fn test_enter_without_candidates_does_nothing() {
    let (mut app, _rx) = app(service());

    assert!(!app.handle_key(key(KeyCode::Enter)));
    assert_eq!(app.engine.operand(Slot::First), None);
}

//! End-to-end orchestration scenarios against the in-memory server

mod common;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;

use chatfront::config::Config;
use chatfront::core::mode::Mode;
use chatfront::core::types::{ChatMessage, SessionDetail};
use chatfront::ui_backend::{AppEvent, Command, ErrorLevel, HealthStatus, StoreEvent};

use common::{
    service, service_over, service_with, sessions, settle, write_file, MockBackend,
    StalledBackend,
};

fn seeded() -> std::sync::Arc<MockBackend> {
    MockBackend::with_sessions(sessions(&[
        ("a", "Untitled", 2),
        ("b", "A rather long conversation title", 6),
    ]))
}

fn notification(service: &chatfront::AppService) -> String {
    service
        .state()
        .notification()
        .map(|n| n.message)
        .unwrap_or_default()
}

mod landing {
    use super::*;

    #[tokio::test]
    async fn test_quick_chat_starts_without_session() {
        let (mut service, _rx) = service(MockBackend::new());
        service.handle_command(Command::SelectQuickChat).await.unwrap();

        assert_eq!(service.mode(), Mode::QuickChat);
        assert!(!service.sidebar_visible());
        assert!(service.chat().session_id().is_none());
    }

    #[tokio::test]
    async fn test_illegal_trigger_keeps_mode() {
        let backend = MockBackend::new();
        let (mut service, _rx) = service(backend.clone());
        service.handle_command(Command::NewSession).await.unwrap();

        assert_eq!(service.mode(), Mode::Home);
        assert!(notification(&service).contains("Not available"));
        assert_eq!(backend.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_from_indexing_returns_home() {
        let (mut service, _rx) = service(MockBackend::new());
        service.handle_command(Command::SelectIndexDocuments).await.unwrap();
        assert_eq!(service.mode(), Mode::Indexing);
        assert!(service.view().await.index_modal.is_some());

        service.handle_command(Command::Cancel).await.unwrap();
        assert_eq!(service.mode(), Mode::Home);
    }

    #[tokio::test]
    async fn test_slash_command_typed_into_composer() {
        let (mut service, _rx) = service(MockBackend::new());
        for c in "/quick".chars() {
            service
                .handle_command(Command::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
                .await
                .unwrap();
        }
        service
            .handle_command(Command::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .await
            .unwrap();

        assert_eq!(service.mode(), Mode::QuickChat);
        assert_eq!(service.composer().text(), "");
    }

    #[tokio::test]
    async fn test_message_outside_chat_is_not_sent() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        service
            .handle_command(Command::SetDraft("hello".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(backend.calls("send_message"), 0);
        assert_eq!(service.composer().text(), "hello");
    }
}

mod quick_chat {
    use super::*;

    #[tokio::test]
    async fn test_first_send_creates_and_activates_session() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::SetDraft("  What is our leave policy?  ".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        assert!(service.composer().is_in_flight());
        assert_eq!(service.composer().text(), "");

        settle(&mut service, &mut rx).await;

        assert_eq!(service.chat().session_id().map(String::as_str), Some("session-1"));
        assert_eq!(backend.sent()[0].text, "What is our leave policy?");
        assert_eq!(
            service.chat().transcript()[1],
            ChatMessage::assistant("Echo: What is our leave policy?")
        );
        assert!(!service.composer().is_in_flight());
        assert!(service.sidebar_visible());
        assert!(service.refresh_slot().is_ready());
        assert!(service.store().find("session-1").await.is_some());
    }

    #[tokio::test]
    async fn test_second_send_reuses_session() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        for text in ["first", "second"] {
            service
                .handle_command(Command::SetDraft(text.into()))
                .await
                .unwrap();
            service.handle_command(Command::Submit).await.unwrap();
            settle(&mut service, &mut rx).await;
        }

        assert_eq!(backend.calls("create_session"), 1);
        let sent = backend.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.session_id == "session-1"));
        assert_eq!(
            service.store().find("session-1").await.unwrap().message_count,
            4
        );
    }

    #[tokio::test]
    async fn test_abandoned_quick_chat_keeps_its_session() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::SetDraft("first chat".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();

        // Start over before the reply arrives
        service.handle_command(Command::NewSession).await.unwrap();
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.mode(), Mode::QuickChat);
        assert!(service.chat().session_id().is_none());
        assert!(service.chat().transcript().is_empty());
        assert!(!service.composer().is_in_flight());
        assert_eq!(backend.sent()[0].session_id, "session-1");

        // The fresh quick chat gets a session of its own
        service
            .handle_command(Command::SetDraft("second chat".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.chat().session_id().map(String::as_str), Some("session-2"));
        assert_eq!(
            service.chat().transcript(),
            &[
                ChatMessage::user("second chat"),
                ChatMessage::assistant("Echo: second chat")
            ]
        );
    }

    #[tokio::test]
    async fn test_create_failure_restores_draft() {
        let backend = MockBackend::new();
        backend.fail("create_session");
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::SetDraft("hello".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.composer().text(), "hello");
        assert!(service.chat().session_id().is_none());
        assert_eq!(backend.calls("send_message"), 0);
        assert!(notification(&service).contains("kept"));
    }
}

mod composer {
    use super::*;

    async fn chatting_in_a() -> (
        std::sync::Arc<MockBackend>,
        chatfront::AppService,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let backend = seeded();
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::OpenSession("a".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;
        (backend, service, rx)
    }

    #[tokio::test]
    async fn test_double_submit_sends_once() {
        let (backend, mut service, mut rx) = chatting_in_a().await;
        service
            .handle_command(Command::SetDraft("first".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        service
            .handle_command(Command::SetDraft("second".into()))
            .await
            .unwrap();
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        let sent = backend.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "first");
        assert_eq!(service.composer().text(), "second");
    }

    #[tokio::test]
    async fn test_failure_restores_exact_draft_and_retry_matches() {
        let (backend, mut service, mut rx) = chatting_in_a().await;
        let dir = TempDir::new().unwrap();
        let notes = write_file(dir.path(), "notes.txt", "meeting notes");
        let tool = write_file(dir.path(), "tool.exe", "MZ");

        service
            .handle_command(Command::Attach(vec![notes, tool]))
            .await
            .unwrap();
        assert_eq!(service.composer().attachments().len(), 1);
        service
            .handle_command(Command::SetDraft(" summarise these ".into()))
            .await
            .unwrap();
        let before = service.composer().draft().clone();

        backend.fail("send_message");
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.composer().draft(), &before);
        assert_eq!(
            service.state().notification().map(|n| n.level),
            Some(ErrorLevel::Error)
        );

        backend.recover("send_message");
        service.handle_command(Command::Submit).await.unwrap();
        settle(&mut service, &mut rx).await;

        let sent = backend.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "summarise these");
        assert_eq!(sent[0].attachments, vec!["notes.txt".to_string()]);
        assert!(service.composer().draft().is_blank());
    }

    #[tokio::test]
    async fn test_detach_by_position() {
        let (_backend, mut service, _rx) = chatting_in_a().await;
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.md", "# a");
        let b = write_file(dir.path(), "b.md", "# b");
        service
            .handle_command(Command::Attach(vec![a, b]))
            .await
            .unwrap();

        service.handle_command(Command::Detach(1)).await.unwrap();
        let names: Vec<_> = service
            .composer()
            .attachments()
            .iter()
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(names, vec!["b.md".to_string()]);
        assert_eq!(
            service.composer().placeholder(),
            "Ask questions about your attached files..."
        );
    }
}

mod indexes {
    use super::*;

    #[tokio::test]
    async fn test_choosing_index_creates_linked_session() {
        let backend = MockBackend::new();
        backend.add_index("Policy-2024", "Policies 2024", 12);
        let (mut service, mut rx) = service(backend.clone());
        let mut events = service.store().subscribe();

        service
            .handle_command(Command::SelectChatWithIndex)
            .await
            .unwrap();
        assert_eq!(service.mode(), Mode::PickingExistingIndex);
        settle(&mut service, &mut rx).await;
        assert_eq!(service.view().await.index_picker.unwrap().len(), 1);

        service
            .handle_command(Command::ChooseIndex("Policy-2024".into()))
            .await
            .unwrap();
        // Nothing moves until the session exists and is linked
        assert_eq!(service.mode(), Mode::PickingExistingIndex);
        settle(&mut service, &mut rx).await;

        assert_eq!(service.mode(), Mode::ChatExisting);
        assert_eq!(service.chat().session_id().map(String::as_str), Some("session-1"));
        assert_eq!(
            backend.linked_index("session-1").as_deref(),
            Some("Policy-2024")
        );

        let mut selected = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let StoreEvent::Selected { id } = event {
                selected.push(id);
            }
        }
        assert_eq!(selected, vec!["session-1".to_string()]);
        assert_eq!(
            service.chat().detail().and_then(|d| d.index_id.clone()).as_deref(),
            Some("Policy-2024")
        );
    }

    #[tokio::test]
    async fn test_failed_creation_keeps_picker_open() {
        let backend = MockBackend::new();
        backend.fail("create_session");
        let (mut service, mut rx) = service(backend);
        service
            .handle_command(Command::SelectChatWithIndex)
            .await
            .unwrap();
        service
            .handle_command(Command::ChooseIndex("Policy-2024".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.mode(), Mode::PickingExistingIndex);
        assert_eq!(notification(&service), "Couldn't start a new conversation");
    }

    #[tokio::test]
    async fn test_cancelled_picker_ignores_late_session() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        service
            .handle_command(Command::SelectChatWithIndex)
            .await
            .unwrap();
        service
            .handle_command(Command::ChooseIndex("Policy-2024".into()))
            .await
            .unwrap();
        service.handle_command(Command::Cancel).await.unwrap();
        service
            .handle_command(Command::SelectChatWithIndex)
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.mode(), Mode::PickingExistingIndex);
        assert!(service.chat().session_id().is_none());
        assert_eq!(backend.calls("create_session"), 1);
    }

    #[tokio::test]
    async fn test_indexing_completion_opens_chat() {
        let backend = MockBackend::new();
        let (mut service, mut rx) = service(backend.clone());
        let dir = TempDir::new().unwrap();
        let doc = write_file(dir.path(), "handbook.md", "# Handbook");

        service
            .handle_command(Command::SelectIndexDocuments)
            .await
            .unwrap();
        service
            .handle_command(Command::StartIndexing {
                name: "Handbook".into(),
                paths: vec![doc],
            })
            .await
            .unwrap();
        assert!(service.state().indexing_in_progress());

        settle(&mut service, &mut rx).await;

        assert_eq!(service.mode(), Mode::ChatExisting);
        assert_eq!(service.chat().session_id().map(String::as_str), Some("session-1"));
        assert_eq!(backend.linked_index("session-1").as_deref(), Some("idx-Handbook"));
        assert!(!service.state().indexing_in_progress());
    }

    #[tokio::test]
    async fn test_index_picker_overlay_links_active_session() {
        let backend = seeded();
        backend.add_index("Policy-2024", "Policies 2024", 12);
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::OpenSession("a".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        service.handle_command(Command::OpenIndexPicker).await.unwrap();
        assert!(service.modes().index_picker_overlay_visible());
        settle(&mut service, &mut rx).await;
        service
            .handle_command(Command::ChooseIndex("Policy-2024".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert!(!service.modes().index_picker_overlay_visible());
        assert_eq!(service.mode(), Mode::ChatExisting);
        assert_eq!(backend.linked_index("a").as_deref(), Some("Policy-2024"));
    }
}

mod session_lifecycle {
    use super::*;

    async fn open(backend: &std::sync::Arc<MockBackend>, id: &str) -> (
        chatfront::AppService,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (mut service, mut rx) = service(backend.clone());
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::OpenSession(id.into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;
        (service, rx)
    }

    #[tokio::test]
    async fn test_opening_session_loads_sidebar() {
        let backend = seeded();
        let (service, _rx) = open(&backend, "a").await;

        assert_eq!(service.mode(), Mode::ChatExisting);
        let view = service.view().await;
        let sidebar = view.sidebar.unwrap();
        assert_eq!(sidebar.rows.len(), 2);
        assert!(sidebar.rows[0].active);
        assert_eq!(sidebar.rows[1].title, "A rather long conversatio...");
        let footer = sidebar.footer.unwrap();
        assert_eq!(footer.session_count, 2);
        assert_eq!(footer.message_count_total, 8);
    }

    /// Ask, then confirm
    async fn delete(
        service: &mut chatfront::AppService,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
        id: &str,
    ) {
        for _ in 0..2 {
            service
                .handle_command(Command::DeleteSession(id.into()))
                .await
                .unwrap();
        }
        settle(service, rx).await;
    }

    #[tokio::test]
    async fn test_delete_asks_before_calling_server() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "b").await;

        service
            .handle_command(Command::DeleteSession("b".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(backend.calls("delete_session"), 0);
        assert_eq!(service.pending_delete().map(String::as_str), Some("b"));
        assert_eq!(
            service.state().notification().map(|n| n.level),
            Some(ErrorLevel::Warning)
        );
        assert!(notification(&service).contains("A rather long conversation title"));

        service.handle_command(Command::Cancel).await.unwrap();
        assert!(service.pending_delete().is_none());
        assert_eq!(service.mode(), Mode::ChatExisting);

        // Asking again starts over
        service
            .handle_command(Command::DeleteSession("b".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;
        assert_eq!(backend.calls("delete_session"), 0);
    }

    #[tokio::test]
    async fn test_deleting_active_session_returns_home() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;

        delete(&mut service, &mut rx, "a").await;

        assert!(service.chat().session_id().is_none());
        assert_eq!(service.mode(), Mode::Home);
        assert!(service.store().find("a").await.is_none());
        assert!(!service.refresh_slot().is_ready());
    }

    #[tokio::test]
    async fn test_deleting_other_session_keeps_active() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;

        delete(&mut service, &mut rx, "b").await;

        assert_eq!(service.chat().session_id().map(String::as_str), Some("a"));
        assert_eq!(service.mode(), Mode::ChatExisting);
        assert_eq!(service.store().sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_everything() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;
        backend.fail("delete_session");

        delete(&mut service, &mut rx, "a").await;

        assert_eq!(service.chat().session_id().map(String::as_str), Some("a"));
        assert_eq!(service.store().sessions().await.len(), 2);
        assert_eq!(notification(&service), "Couldn't delete the conversation");
    }

    #[tokio::test]
    async fn test_blank_rename_makes_no_call() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;
        let before = backend.total_calls();

        service
            .handle_command(Command::RenameSession {
                id: "a".into(),
                title: "   ".into(),
            })
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(backend.total_calls(), before);
        assert_eq!(notification(&service), "Enter a title for the conversation");
    }

    #[tokio::test]
    async fn test_rename_updates_chat_title() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;

        service
            .handle_command(Command::RenameSession {
                id: "a".into(),
                title: "Budget".into(),
            })
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        let view = service.view().await;
        assert_eq!(view.chat.unwrap().title.as_deref(), Some("Budget"));
        assert_eq!(service.chat().session_id().map(String::as_str), Some("a"));
    }

    #[tokio::test]
    async fn test_renaming_another_session_opens_it() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;

        service
            .handle_command(Command::RenameSession {
                id: "b".into(),
                title: "Q3 report".into(),
            })
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.chat().session_id().map(String::as_str), Some("b"));
        assert_eq!(service.chat().detail().map(|d| d.title.as_str()), Some("Q3 report"));
    }

    #[tokio::test]
    async fn test_picking_active_session_still_announces_it() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;
        let mut events = service.store().subscribe();
        let fetches = backend.calls("get_session");

        service
            .handle_command(Command::OpenSession("a".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Selected { id: "a".into() }
        );
        assert_eq!(backend.calls("get_session"), fetches);
    }

    #[tokio::test]
    async fn test_late_detail_is_ignored() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;
        service
            .handle_command(Command::OpenSession("b".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        service
            .handle_event(AppEvent::DetailLoaded {
                session_id: "a".into(),
                result: Ok(SessionDetail {
                    id: "a".into(),
                    title: "Untitled".into(),
                    message_count: 1,
                    index_id: None,
                    messages: vec![ChatMessage::user("stale")],
                }),
            })
            .await
            .unwrap();

        assert_eq!(service.chat().session_id().map(String::as_str), Some("b"));
        assert_eq!(service.chat().detail().map(|d| d.id.as_str()), Some("b"));
        assert!(service.chat().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_keeps_list_and_retry_clears_error() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;

        backend.fail("get_sessions");
        service.handle_command(Command::RefreshSessions).await.unwrap();
        settle(&mut service, &mut rx).await;
        assert_eq!(
            service.panel().error().as_deref(),
            Some("Couldn't load conversations")
        );
        assert_eq!(service.store().sessions().await.len(), 2);

        backend.recover("get_sessions");
        service
            .handle_command(Command::RetryLoadSessions)
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;
        assert!(service.panel().error().is_none());
    }

    #[tokio::test]
    async fn test_refresh_before_mount_is_noop() {
        let backend = seeded();
        let (mut service, _rx) = service(backend.clone());
        service.handle_command(Command::RefreshSessions).await.unwrap();

        assert_eq!(backend.calls("get_sessions"), 0);
        assert!(notification(&service).contains("not showing"));
    }

    #[tokio::test]
    async fn test_collapsed_sidebar_unmounts_panel() {
        let backend = seeded();
        let (mut service, mut rx) = open(&backend, "a").await;
        assert!(service.refresh_slot().is_ready());

        service.handle_command(Command::ToggleSidebar).await.unwrap();
        assert!(!service.sidebar_visible());
        assert!(!service.refresh_slot().is_ready());

        service.handle_command(Command::ToggleSidebar).await.unwrap();
        assert!(service.refresh_slot().is_ready());
        settle(&mut service, &mut rx).await;
        assert_eq!(backend.calls("get_sessions"), 2);
    }

    #[tokio::test]
    async fn test_sidebar_starts_collapsed_from_config() {
        let backend = seeded();
        let mut config = Config::default();
        config.ui.sidebar_open = false;
        let (mut service, mut rx) = service_with(backend.clone(), &config);
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::OpenSession("a".into()))
            .await
            .unwrap();
        settle(&mut service, &mut rx).await;

        assert!(!service.sidebar_visible());
        assert_eq!(backend.calls("get_sessions"), 0);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_startup_probe_connects() {
        let (mut service, mut rx) = service(MockBackend::new());
        assert_eq!(service.state().health(), HealthStatus::Checking);
        service.start();
        settle(&mut service, &mut rx).await;
        assert_eq!(service.state().health(), HealthStatus::Connected);
    }

    #[tokio::test]
    async fn test_unreachable_server_disables_composer() {
        let backend = MockBackend::new();
        backend.fail("check_health");
        let (mut service, mut rx) = service(backend.clone());
        service.start();
        settle(&mut service, &mut rx).await;

        assert_eq!(service.state().health(), HealthStatus::Error);
        assert!(service.composer().is_disabled());

        backend.recover("check_health");
        service.handle_command(Command::CheckHealth).await.unwrap();
        settle(&mut service, &mut rx).await;
        assert!(!service.composer().is_disabled());
    }
}

mod responsiveness {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn stalled() -> (
        chatfront::AppService,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        service_over(Arc::new(StalledBackend), &Config::default())
    }

    #[tokio::test]
    async fn test_slow_server_never_blocks_commands() {
        let (mut service, _rx) = stalled();

        let handled = tokio::time::timeout(Duration::from_millis(500), async {
            service
                .handle_command(Command::SelectChatWithIndex)
                .await
                .unwrap();
            service
                .handle_command(Command::ChooseIndex("Policy-2024".into()))
                .await
                .unwrap();
            service.handle_command(Command::Cancel).await.unwrap();
            service.handle_command(Command::SelectQuickChat).await.unwrap();
            service
                .handle_command(Command::OpenSession("a".into()))
                .await
                .unwrap();
            service
                .handle_command(Command::RenameSession {
                    id: "a".into(),
                    title: "Budget".into(),
                })
                .await
                .unwrap();
            service.handle_command(Command::RefreshSessions).await.unwrap();
        })
        .await;

        assert!(handled.is_ok());
        assert_eq!(service.mode(), Mode::ChatExisting);
    }

    #[tokio::test]
    async fn test_sidebar_shows_loading_while_list_is_fetched() {
        let (mut service, _rx) = stalled();
        service.handle_command(Command::SelectQuickChat).await.unwrap();
        service
            .handle_command(Command::OpenSession("a".into()))
            .await
            .unwrap();

        let sidebar = service.view().await.sidebar.unwrap();
        assert!(sidebar.loading);
        assert!(sidebar.rows.is_empty());
    }
}

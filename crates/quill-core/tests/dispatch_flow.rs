//! End-to-end dispatch flow tests
//!
//! Drives the dispatcher the way the gateway does: messages in, replies out,
//! and the loop must survive whatever the handlers throw at it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use quill_core::commands::{
    CommandHandler, CommandModule, CommandRegistry, CommandSpec, Dispatcher,
};
use quill_core::error::QuillResult;
use quill_core::gateway::{
    ChannelRef, Embed, Gateway, GatewayEvent, GuildRef, Message, MessageKind, ReplySink, UserRef,
};
use quill_core::permissions::CheckerRegistry;
use quill_core::{CommandError, bootstrap};

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(ChannelRef, Embed)>>,
}

impl RecordingSink {
    fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send_embed(&self, channel: &ChannelRef, embed: Embed) -> QuillResult<()> {
        self.sent.lock().push((channel.clone(), embed));
        Ok(())
    }
}

struct TestModule {
    ping_count: Arc<AtomicUsize>,
}

impl CommandModule for TestModule {
    fn name(&self) -> &str {
        "test"
    }

    fn handlers(self: Arc<Self>) -> Vec<CommandHandler> {
        let counter = Arc::clone(&self.ping_count);
        vec![
            CommandHandler::new(CommandSpec::new("ping", "Liveness check"), move |_ctx| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
            CommandHandler::new(
                CommandSpec::new("explode", "Always fails"),
                |_ctx| async { Err(CommandError::execution("the gears jammed")) },
            ),
        ]
    }
}

struct Fixture {
    dispatcher: Arc<Dispatcher>,
    sink: Arc<RecordingSink>,
    ping_count: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let ping_count = Arc::new(AtomicUsize::new(0));
    let module = Arc::new(TestModule {
        ping_count: Arc::clone(&ping_count),
    });
    let (commands, _checkers) = bootstrap(vec![module], Vec::new()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = Arc::new(Dispatcher::new(
        UserRef::bot(500, "quill"),
        Arc::new(commands),
        Arc::clone(&sink) as Arc<dyn ReplySink>,
    ));
    Fixture {
        dispatcher,
        sink,
        ping_count,
    }
}

fn message(content: &str) -> Message {
    Message::regular(
        1,
        UserRef::new(2, "alice"),
        ChannelRef::new(3, "general"),
        GuildRef::new(4, "testers", 2),
        content,
    )
}

#[tokio::test]
async fn successful_command_sends_no_reply() {
    let fx = fixture();

    fx.dispatcher.handle_message(message("?ping")).await.unwrap();

    assert_eq!(fx.ping_count.load(Ordering::SeqCst), 1);
    assert_eq!(fx.sink.count(), 0);
}

#[tokio::test]
async fn mention_prefix_also_dispatches() {
    let fx = fixture();

    fx.dispatcher
        .handle_message(message("<@500> ping"))
        .await
        .unwrap();

    assert_eq!(fx.ping_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_command_is_silently_ignored() {
    let fx = fixture();

    fx.dispatcher
        .handle_message(message("?unknown foo"))
        .await
        .unwrap();

    assert_eq!(fx.sink.count(), 0);
    assert_eq!(fx.ping_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unprefixed_and_non_user_messages_are_ignored() {
    let fx = fixture();

    fx.dispatcher
        .handle_message(message("ping without prefix"))
        .await
        .unwrap();

    let mut system = message("?ping");
    system.kind = MessageKind::System;
    fx.dispatcher.handle_message(system).await.unwrap();

    let mut from_bot = message("?ping");
    from_bot.author = UserRef::bot(77, "otherbot");
    fx.dispatcher.handle_message(from_bot).await.unwrap();

    assert_eq!(fx.ping_count.load(Ordering::SeqCst), 0);
    assert_eq!(fx.sink.count(), 0);
}

#[tokio::test]
async fn failing_command_yields_exactly_one_report() {
    let fx = fixture();

    fx.dispatcher
        .handle_message(message("?explode now"))
        .await
        .unwrap();

    let sent = fx.sink.sent.lock();
    assert_eq!(sent.len(), 1);
    let (channel, embed) = &sent[0];
    assert_eq!(channel.id, 3);
    assert_eq!(embed.title.as_deref(), Some("Error executing command"));
    assert!(embed.description.as_deref().unwrap().contains("explode"));
    let reason = embed.fields.iter().find(|f| f.name == "Reason").unwrap();
    assert_eq!(reason.value, "the gears jammed");
}

#[tokio::test]
async fn loop_survives_a_failing_command() {
    let fx = fixture();
    let gateway = Gateway::new(16);

    let handle = tokio::spawn(Arc::clone(&fx.dispatcher).run(gateway.clone()));

    // The dispatcher subscribes from inside the spawned task; events
    // published before that would be lost.
    tokio::time::timeout(Duration::from_secs(5), async {
        while gateway.subscriber_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("dispatcher never subscribed");

    gateway.publish(GatewayEvent::MessageCreated(message("?explode")));
    gateway.publish(GatewayEvent::MessageCreated(message("?ping")));

    // Both events are handled on their own tasks; wait for the effects.
    tokio::time::timeout(Duration::from_secs(5), async {
        while fx.ping_count.load(Ordering::SeqCst) < 1 || fx.sink.count() < 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("dispatcher stopped processing after a failure");

    assert_eq!(fx.sink.count(), 1);
    assert_eq!(fx.ping_count.load(Ordering::SeqCst), 1);

    drop(gateway);
    handle.await.unwrap();
}

#[tokio::test]
async fn registry_counts_identities_not_keys() {
    let module = Arc::new(TestModule {
        ping_count: Arc::new(AtomicUsize::new(0)),
    });
    let registry = CommandRegistry::build(vec![module], &CheckerRegistry::empty());

    assert_eq!(registry.count(), 2);
    assert_eq!(registry.commands().len(), registry.count());
}

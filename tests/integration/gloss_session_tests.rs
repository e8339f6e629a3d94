/*!
 * Integration tests for gloss runs.
 *
 * Every test drives a `GlossSession` end to end against the scripted mock
 * provider and checks what observers see.
 */

use std::sync::Arc;
use std::time::Duration;

use hanzi_gloss::providers::mock::MockProvider;
use hanzi_gloss::translation::{RunOutcome, RunState, SessionConfig};
use hanzi_gloss::{OrchestrationError, TargetLanguage};

use crate::common::{
    FIVE_SENTENCES, group_texts, group_translations, init_test_logging, session_config,
    session_with,
};

#[tokio::test]
async fn test_run_withTwoSentences_shouldTranslateTextAndEachGroup() {
    init_test_logging();
    let mock = MockProvider::working();
    let session = session_with(mock.clone(), session_config());
    session.set_input_text("你好。再见！");

    let outcome = session.run_orchestration().await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Succeeded);
    assert_eq!(snapshot.progress, 100);
    assert!(!snapshot.is_loading);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.main_translation.as_deref(), Some("[es] 你好。再见！"));
    assert_eq!(group_texts(&snapshot), vec!["你好。", "再见！"]);
    assert_eq!(snapshot.groups[0].reading(), "nǐ hǎo");
    assert_eq!(snapshot.groups[1].reading(), "zài jiàn");
    assert_eq!(
        group_translations(&snapshot),
        vec![Some("[es] 你好。".to_string()), Some("[es] 再见！".to_string())]
    );
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_run_withEnglishTarget_shouldRequestEnglish() {
    let session = session_with(MockProvider::working(), session_config());
    session.set_input_text("你好。");
    session.set_target_language(TargetLanguage::En);

    session.run_orchestration().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.target_language, TargetLanguage::En);
    assert_eq!(snapshot.main_translation.as_deref(), Some("[en] 你好。"));
}

#[tokio::test]
async fn test_run_withPunctuationOnlyGroup_shouldNotRequestIt() {
    let mock = MockProvider::working();
    let session = session_with(mock.clone(), session_config());
    session.set_input_text("你好。！再见");

    session.run_orchestration().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(group_texts(&snapshot), vec!["你好。", "！", "再见"]);
    assert_eq!(snapshot.groups[1].translation, None);
    assert_eq!(mock.requested_texts(), vec!["你好。！再见", "你好。", "再见"]);
    assert_eq!(snapshot.progress, 100);
}

#[tokio::test]
async fn test_run_withLoneCommaGroup_shouldNeverSendTheComma() {
    let mock = MockProvider::working();
    let config = SessionConfig {
        max_group_size: 1,
        ..session_config()
    };
    let session = session_with(mock.clone(), config);
    session.set_input_text("你。，我");

    session.run_orchestration().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(group_texts(&snapshot), vec!["你。", "，", "我"]);
    assert_eq!(
        group_translations(&snapshot),
        vec![Some("[es] 你。".to_string()), None, Some("[es] 我".to_string())]
    );
    assert!(!mock.requested_texts().contains(&"，".to_string()));
}

#[tokio::test]
async fn test_run_withFailureOnThirdGroup_shouldKeepEarlierTranslations() {
    init_test_logging();
    // Request 1 is the whole text, so request 4 is the third group
    let mock = MockProvider::fail_on_request(4);
    let session = session_with(mock.clone(), session_config());
    session.set_input_text(FIVE_SENTENCES);

    let result = session.run_orchestration().await;
    assert!(matches!(result, Err(OrchestrationError::Translation(_))));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Failed);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.error.as_deref(), Some("No se pudo completar la traducción."));
    assert_eq!(snapshot.main_translation.as_deref(), Some("[es] 一。二。三。四。五。"));
    assert_eq!(
        group_translations(&snapshot),
        vec![
            Some("[es] 一。".to_string()),
            Some("[es] 二。".to_string()),
            None,
            None,
            None,
        ]
    );
    assert!(snapshot.progress < 100);
    assert_eq!(mock.request_count(), 4);
}

#[tokio::test]
async fn test_run_withMainTranslationFailure_shouldTranslateNoGroup() {
    let mock = MockProvider::fail_on_request(1);
    let session = session_with(mock.clone(), session_config());
    session.set_input_text("你好。再见！");
    session.set_target_language(TargetLanguage::En);

    let result = session.run_orchestration().await;
    assert!(result.is_err());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("Translation could not be completed."));
    assert!(snapshot.main_translation.is_none());
    assert_eq!(group_texts(&snapshot), vec!["你好。", "再见！"]);
    assert!(snapshot.groups.iter().all(|group| group.translation.is_none()));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_run_withBlankInput_shouldSkipWithoutRequests() {
    let mock = MockProvider::working();
    let session = session_with(mock.clone(), session_config());
    session.set_input_text("  \n\t ");

    let outcome = session.run_orchestration().await.unwrap();

    assert_eq!(outcome, RunOutcome::SkippedEmptyInput);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Idle);
    assert_eq!(snapshot.progress, 0);
    assert!(snapshot.groups.is_empty());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_run_shouldPublishMonotonicProgress() {
    let session = session_with(MockProvider::slow(2), session_config());
    session.set_input_text(FIVE_SENTENCES);

    let mut updates = session.subscribe();
    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            seen.push(snapshot.progress);
            if snapshot.state == RunState::Succeeded {
                break;
            }
        }
        seen
    });

    session.run_orchestration().await.unwrap();
    let seen = collector.await.unwrap();

    assert!(seen.len() >= 3, "expected intermediate updates, got {:?}", seen);
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "progress went backwards: {:?}", seen);
    assert!(seen[0] >= 5);
    assert_eq!(seen.last(), Some(&100));
}

#[tokio::test]
async fn test_run_whileAnotherRunIsActive_shouldRejectSecondRun() {
    let mock = MockProvider::slow(50);
    let session = Arc::new(session_with(mock.clone(), session_config()));
    session.set_input_text("你好。再见！");

    let (first, second) = tokio::join!(session.run_orchestration(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.is_running());
        session.run_orchestration().await
    });

    assert_eq!(first.unwrap(), RunOutcome::Completed);
    assert!(matches!(second, Err(OrchestrationError::AlreadyRunning)));
    assert_eq!(session.snapshot().state, RunState::Succeeded);
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_second_run_shouldNeverShowPreviousTranslationBesideNewGroups() {
    let session = session_with(MockProvider::slow(20), session_config());
    session.set_input_text("你好。");
    session.run_orchestration().await.unwrap();
    assert_eq!(session.snapshot().main_translation.as_deref(), Some("[es] 你好。"));

    session.set_input_text("再见！明天见。");
    let mut updates = session.subscribe();
    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            let done = snapshot.state == RunState::Succeeded;
            seen.push(snapshot);
            if done {
                break;
            }
        }
        seen
    });

    session.run_orchestration().await.unwrap();
    let seen = collector.await.unwrap();

    let running: Vec<_> = seen.iter().filter(|s| s.state == RunState::Running).collect();
    assert!(!running.is_empty());
    assert!(running[0].main_translation.is_none());
    for snapshot in &seen {
        assert_ne!(snapshot.main_translation.as_deref(), Some("[es] 你好。"));
        assert!(group_texts(snapshot).iter().all(|text| text != "你好。"));
    }
    assert!(running.iter().any(|s| s.progress == 15 && s.main_translation.is_none()));

    let snapshot = session.snapshot();
    assert_eq!(group_texts(&snapshot), vec!["再见！", "明天见。"]);
    assert_eq!(snapshot.main_translation.as_deref(), Some("[es] 再见！明天见。"));
}

#[tokio::test]
async fn test_cancel_duringRun_shouldStopBeforeNextRequest() {
    init_test_logging();
    let mock = MockProvider::slow(50);
    let session = session_with(mock.clone(), session_config());
    session.set_input_text(FIVE_SENTENCES);

    let (result, ()) = tokio::join!(session.run_orchestration(), async {
        tokio::time::sleep(Duration::from_millis(75)).await;
        session.cancel();
    });

    assert!(matches!(result, Err(OrchestrationError::Cancelled)));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Failed);
    assert_eq!(snapshot.error.as_deref(), Some("La traducción fue cancelada."));
    assert!(mock.request_count() < 6);
    assert!(snapshot.groups.last().is_some_and(|group| group.translation.is_none()));
}

#[tokio::test]
async fn test_cancel_whenIdle_shouldNotAffectNextRun() {
    let session = session_with(MockProvider::working(), session_config());
    session.set_input_text("你好。");

    session.cancel();
    assert_eq!(session.run_orchestration().await.unwrap(), RunOutcome::Completed);
}

#[tokio::test]
async fn test_clear_afterRun_shouldResetTextAndResults() {
    let session = session_with(MockProvider::failing(), session_config());
    session.set_input_text("你好。");
    let _ = session.run_orchestration().await;
    assert!(session.snapshot().error.is_some());

    session.clear();

    let snapshot = session.snapshot();
    assert!(snapshot.input_text.is_empty());
    assert!(snapshot.main_translation.is_none());
    assert!(snapshot.groups.is_empty());
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_rerun_afterFailure_shouldClearPreviousError() {
    let mock = MockProvider::fail_on_request(1);
    let session = session_with(mock, session_config());
    session.set_input_text("你好。");

    assert!(session.run_orchestration().await.is_err());
    assert!(session.snapshot().error.is_some());

    assert!(session.run_orchestration().await.is_ok());
    let snapshot = session.snapshot();
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.state, RunState::Succeeded);
}

#[tokio::test]
async fn test_progress_afterResetDelay_shouldReturnToIdle() {
    let config = SessionConfig {
        progress_reset_delay: Duration::from_millis(10),
        ..SessionConfig::default()
    };
    let session = session_with(MockProvider::working(), config);
    session.set_input_text("你好。");

    session.run_orchestration().await.unwrap();
    assert_eq!(session.snapshot().progress, 100);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.progress, 0);
    assert_eq!(snapshot.state, RunState::Idle);
    assert_eq!(group_texts(&snapshot), vec!["你好。"]);
    assert!(snapshot.main_translation.is_some());
}

#[tokio::test]
async fn test_run_withEmptyTranslations_shouldStillSucceed() {
    let session = session_with(MockProvider::empty(), session_config());
    session.set_input_text("你好。");

    session.run_orchestration().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, RunState::Succeeded);
    assert_eq!(snapshot.main_translation.as_deref(), Some(""));
    assert_eq!(snapshot.groups[0].translation.as_deref(), Some(""));
}

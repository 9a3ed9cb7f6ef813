use std::sync::Arc;
use std::sync::atomic::Ordering;

use uuid::Uuid;

use skagen::application::ports::{ImageFetcher, ModerationEndpoint};
use skagen::application::services::{
    GenerationService, ModerationService, SessionStore, StudioOutcome, StudioService,
};
use skagen::domain::{ContentRating, ImageQuality, ImageSize};

use crate::helpers::{
    SAFE_IMAGE_ANALYSIS, StubChatClient, StubImageClient, StubImageFetcher,
    StubModerationEndpoint,
};

struct StudioFixture {
    studio: StudioService<StubModerationEndpoint, StubChatClient, StubImageClient>,
    image_client: Arc<StubImageClient>,
    moderation_endpoint: Arc<StubModerationEndpoint>,
}

fn fixture(
    moderation_endpoint: StubModerationEndpoint,
    chat: StubChatClient,
    image_client: StubImageClient,
    fetcher: StubImageFetcher,
) -> StudioFixture {
    let moderation_endpoint = Arc::new(moderation_endpoint);
    let chat = Arc::new(chat);
    let image_client = Arc::new(image_client);

    let moderation = Arc::new(ModerationService::new(
        Arc::clone(&moderation_endpoint),
        Arc::clone(&chat),
    ));
    let generation = Arc::new(GenerationService::new(
        Arc::clone(&image_client),
        Arc::clone(&chat),
    ));

    StudioFixture {
        studio: StudioService::new(
            moderation,
            generation,
            Arc::new(fetcher) as Arc<dyn ImageFetcher>,
            SessionStore::new(),
        ),
        image_client,
        moderation_endpoint,
    }
}

#[tokio::test]
async fn given_safe_prompt_then_pipeline_appends_moderated_record() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );
    let (session_id, _) = fixture.studio.sessions().create().await;

    let outcome = fixture
        .studio
        .create_image(
            session_id,
            "a peaceful mountain landscape at sunset",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    match outcome {
        StudioOutcome::Created(record) => {
            assert_eq!(record.prompt, "a peaceful mountain landscape at sunset");
            assert_eq!(record.moderation.content_rating, ContentRating::General);
            assert!(!record.moderation.requires_warning);
            assert_eq!(record.content_type, "image/png");
        }
        other => panic!("expected created, got {:?}", other),
    }

    let gallery = fixture
        .studio
        .sessions()
        .gallery(session_id, false)
        .await
        .unwrap();
    assert_eq!(gallery.len(), 1);
}

#[tokio::test]
async fn given_keyword_prompt_then_generation_is_never_invoked() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );
    let (session_id, _) = fixture.studio.sessions().create().await;

    let outcome = fixture
        .studio
        .create_image(
            session_id,
            "explicit violence and blood",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    match outcome {
        StudioOutcome::Blocked { reason } => {
            assert!(reason.contains("violent content indicators"));
        }
        other => panic!("expected blocked, got {:?}", other),
    }
    assert_eq!(fixture.image_client.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.moderation_endpoint.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_moderation_endpoint_outage_then_prompt_is_blocked_fail_closed() {
    let fixture = fixture(
        StubModerationEndpoint::failing(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );
    let (session_id, _) = fixture.studio.sessions().create().await;

    let outcome = fixture
        .studio
        .create_image(
            session_id,
            "a peaceful mountain landscape at sunset",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    assert!(matches!(outcome, StudioOutcome::Blocked { .. }));
    assert_eq!(fixture.image_client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_download_failure_then_reports_generation_failure_and_keeps_gallery_empty() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: true },
    );
    let (session_id, _) = fixture.studio.sessions().create().await;

    let outcome = fixture
        .studio
        .create_image(
            session_id,
            "a peaceful mountain landscape at sunset",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    match outcome {
        StudioOutcome::GenerationFailed { error } => {
            assert!(error.contains("Could not download generated image"));
        }
        other => panic!("expected generation failure, got {:?}", other),
    }
    assert_eq!(
        fixture.studio.sessions().gallery_len(session_id).await,
        Some(0)
    );
}

#[tokio::test]
async fn given_unknown_session_then_nothing_runs() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );

    let outcome = fixture
        .studio
        .create_image(
            Uuid::new_v4(),
            "a peaceful mountain landscape at sunset",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    assert_eq!(outcome, StudioOutcome::UnknownSession);
    assert_eq!(fixture.moderation_endpoint.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.image_client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_reset_then_session_state_is_cleared_but_session_survives() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(SAFE_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );
    let sessions = fixture.studio.sessions();
    let (session_id, _) = sessions.create().await;

    sessions.store_recording(session_id, vec![9, 9, 9]).await;
    sessions
        .store_transcript(session_id, "a red balloon".to_string())
        .await;
    fixture
        .studio
        .create_image(
            session_id,
            "a peaceful mountain landscape at sunset",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    assert!(sessions.reset(session_id).await);

    assert!(sessions.exists(session_id).await);
    assert_eq!(sessions.recorded_audio(session_id).await, None);
    assert_eq!(sessions.transcript(session_id).await, None);
    assert_eq!(sessions.gallery_len(session_id).await, Some(0));
}

#[tokio::test]
async fn gallery_is_newest_first_and_filters_adult_records() {
    let fixture = fixture(
        StubModerationEndpoint::not_flagged(),
        StubChatClient::returning(crate::helpers::ADULT_IMAGE_ANALYSIS),
        StubImageClient::succeeding(),
        StubImageFetcher { fail: false },
    );
    let (session_id, _) = fixture.studio.sessions().create().await;

    fixture
        .studio
        .create_image(
            session_id,
            "first prompt about a meadow",
            ImageSize::default(),
            ImageQuality::default(),
        )
        .await;

    let hidden = fixture
        .studio
        .sessions()
        .gallery(session_id, false)
        .await
        .unwrap();
    assert!(hidden.is_empty());

    let shown = fixture
        .studio
        .sessions()
        .gallery(session_id, true)
        .await
        .unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].moderation.content_rating, ContentRating::Adult);
}

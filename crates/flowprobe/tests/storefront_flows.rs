//! Storefront flows against the scripted mock page.

mod support;

use flowprobe::flows::{
    guest_checkout_requires_login, login_and_sign_out, member_checkout, negative_login, negative_login_suite,
    signup_and_sign_out, GuestCheckoutScenario, LoginScenario, MemberCheckoutScenario, SignupScenario,
};
use flowprobe::fixture::{read_negative_credentials, MemoryTable};
use flowprobe::pages::{landing, login, payment, product};
use flowprobe::prelude::*;
use std::sync::{Arc, Mutex};
use support::*;

fn shop() -> Storefront {
    Storefront::new(BASE_URL)
}

fn bridge_in(dir: &tempfile::TempDir) -> UserBridge {
    UserBridge::new(dir.path().join("test-data").join("latestUser.json"))
}

fn row(n: usize, email: &str, password: &str, message: &str) -> NegativeCredentialRow {
    NegativeCredentialRow {
        row: n,
        email: email.to_string(),
        password: password.to_string(),
        error_message: message.to_string(),
    }
}

mod account_tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_persists_user_and_signs_out() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let user = UserGenerator::seeded(11).generate();
        let account = PersistedUser::from(&user);
        let driver = storefront(&account, &account);
        let mut session = session_for(&driver);

        signup_and_sign_out(&mut session, &shop(), &user, &bridge).await.unwrap();

        assert_eq!(bridge.load().unwrap(), account);
        assert_eq!(driver.url(), BASE_URL);
        assert!(driver.was_called("check:"));
        assert_eq!(driver.element(landing::USER_LABEL.selector.key(), 0).unwrap().text, "");
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_signup_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let user = UserGenerator::seeded(12).generate();
        let driver = storefront_rejecting_signup(&PersistedUser::from(&user));
        let mut session = session_for(&driver);

        let err = signup_and_sign_out(&mut session, &shop(), &user, &bridge)
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::AssertionMismatch { ref check, .. } if check == "signed in username"));
        assert!(!bridge.exists());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_with_persisted_user() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.save(&persisted_user()).unwrap();
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        login_and_sign_out(&mut session, &shop(), &bridge).await.unwrap();

        let history = driver.history();
        assert!(history.contains(&format!("fill:{}=mayam123", login::USERNAME.selector.key())));
        assert!(history.contains(&format!("click:{}", landing::SIGN_OUT.selector.key())));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_out_that_removes_label() {
        let label = landing::USER_LABEL.selector.key();
        let driver = MockDriver::new()
            .with_element(landing::MENU_USER_LINK.selector.key(), MockElement::input())
            .with_element(landing::SIGN_OUT.selector.key(), MockElement::new("Sign out"))
            .with_element(label, MockElement::new("alice"))
            .with_rule(MockRule::on_click(landing::SIGN_OUT.selector.key()).remove(label));
        let mut session = session_for(&driver);

        let after = shop().landing.sign_out(&mut session, "alice").await.unwrap();

        assert_eq!(after, "");
        assert!(driver.element(label, 0).is_none());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_with_stale_password_is_assertion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let mut stale = persisted_user();
        stale.password = "Outdated_9!".into();
        bridge.save(&stale).unwrap();
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        let err = login_and_sign_out(&mut session, &shop(), &bridge).await.unwrap_err();
        assert_eq!(err.category(), FailureCategory::Assertion);
        session.close().await.unwrap();
    }
}

mod negative_login_tests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_password_shows_authentication_error() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        negative_login(&mut session, &shop(), &row(2, "mayam123", "nope", WRONG_CREDENTIALS))
            .await
            .unwrap();

        assert!(driver.history().contains(&"reload".to_string()));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_password_shows_field_validation() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        negative_login(&mut session, &shop(), &row(3, "mayam123", "", PASSWORD_REQUIRED))
            .await
            .unwrap();

        assert!(driver.was_called("press:Tab"));
        assert!(!driver.history().iter().any(|c| c == &format!("click:{}", login::SIGN_IN.selector.key())));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_both_empty_shows_username_required() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        negative_login(&mut session, &shop(), &row(4, "", "", USERNAME_REQUIRED))
            .await
            .unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_mismatch_still_closes_popup() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        let err = negative_login(&mut session, &shop(), &row(5, "ghost", "nope", "Account locked"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FlowError::AssertionMismatch { ref actual, .. } if actual == WRONG_CREDENTIALS
        ));
        let history = driver.history();
        assert!(history.contains(&format!("click:{}", login::POPUP_CLOSE.selector.key())));
        assert!(history.contains(&"reload".to_string()));
        session.close().await.unwrap();
    }

    /// Storefront whose login popup has no usable close button
    fn storefront_with_stuck_popup() -> MockDriver {
        storefront(&persisted_user(), &persisted_user())
            .with_rule(MockRule::on_navigate("shop.test").hide(login::POPUP_CLOSE.selector.key()))
    }

    #[tokio::test]
    async fn test_stuck_popup_outranks_mismatch() {
        let driver = storefront_with_stuck_popup();
        let mut session = session_for(&driver);

        let err = negative_login(&mut session, &shop(), &row(2, "ghost", "nope", "Account locked"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), FailureCategory::Infrastructure);
        assert!(matches!(
            err,
            FlowError::PageObjectTimeout { page: "LoginPage", operation: "close_popup", .. }
        ));
        assert!(!driver.history().contains(&"reload".to_string()));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_stuck_popup_fails_matching_row() {
        let driver = storefront_with_stuck_popup();
        let mut session = session_for(&driver);

        let err = negative_login(&mut session, &shop(), &row(2, "ghost", "nope", WRONG_CREDENTIALS))
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::PageObjectTimeout { operation: "close_popup", .. }));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_suite_stops_when_popup_sticks() {
        let rows = vec![
            row(2, "ghost", "nope", "Account locked"),
            row(3, "mayam123", "", PASSWORD_REQUIRED),
        ];
        let driver = storefront_with_stuck_popup();
        let mut session = session_for(&driver);

        let err = negative_login_suite(&mut session, &shop(), &rows).await.unwrap_err();

        assert_eq!(err.category(), FailureCategory::Infrastructure);
        assert!(!driver.was_called("press:Tab"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_suite_from_table_passes() {
        let mut table = MemoryTable::new().with_sheet(
            "Sheet1",
            vec![
                vec![Some("email"), Some("password"), Some("errorMessage")],
                vec![Some("mayam123"), Some("wrong"), Some(WRONG_CREDENTIALS)],
                vec![Some("mayam123"), None, Some(PASSWORD_REQUIRED)],
                vec![None, None, None],
                vec![None, None, Some(USERNAME_REQUIRED)],
            ],
        );
        let rows = read_negative_credentials(&mut table, "Sheet1").unwrap();
        assert_eq!(rows.len(), 3);

        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);
        negative_login_suite(&mut session, &shop(), &rows).await.unwrap();

        let reloads = driver.history().iter().filter(|c| *c == "reload").count();
        assert_eq!(reloads, 3);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_suite_collects_every_mismatch() {
        let rows = vec![
            row(2, "ghost", "nope", "Account locked"),
            row(3, "mayam123", "", PASSWORD_REQUIRED),
            row(4, "", "x", "Email is required"),
        ];
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        let err = negative_login_suite(&mut session, &shop(), &rows).await.unwrap_err();

        match err {
            FlowError::AssertionMismatch { check, actual, .. } => {
                assert_eq!(check, "negative login rows");
                assert!(actual.contains("row 2"));
                assert!(actual.contains("row 4"));
                assert!(!actual.contains("row 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
        session.close().await.unwrap();
    }
}

mod checkout_tests {
    use super::*;

    #[tokio::test]
    async fn test_guest_is_sent_to_login() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        let product = guest_checkout_requires_login(&mut session, &shop()).await.unwrap();

        assert_eq!(product.name, PRODUCT_NAME);
        assert_eq!(product.price_text, PRODUCT_PRICE);
        assert_eq!(driver.url(), GUEST_LOGIN_URL);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_member_pays_by_card() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.save(&persisted_user()).unwrap();
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);
        let card = PaymentCard::test_card();

        let product = member_checkout(&mut session, &shop(), &bridge, &card).await.unwrap();

        assert_eq!(product.price_text, PRODUCT_PRICE);
        assert_eq!(driver.url(), PAYMENT_URL);
        assert!(driver.history().iter().any(|c| c.ends_with(&format!("={}", card.number))));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_safepay_does_not_wait_for_card_form() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);

        shop().payment.select_method(&mut session, PaymentMethod::SafePay).await.unwrap();

        assert!(driver.was_called(&format!("check:{}", payment::SAFEPAY.selector.key())));
        assert!(!driver.element(payment::CARD_NUMBER.selector.key(), 0).unwrap().visible);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_card_method_needs_card_form() {
        let driver = MockDriver::new()
            .with_element(payment::MASTER_CREDIT.selector.key(), MockElement::input())
            .with_element(payment::CARD_NUMBER.selector.key(), MockElement::input().hidden());
        let mut session = session_for(&driver);

        let err = shop()
            .payment
            .select_method(&mut session, PaymentMethod::MasterCredit)
            .await
            .unwrap_err();

        match err {
            FlowError::PageObjectTimeout { operation, element, .. } => {
                assert_eq!(operation, "select_method");
                assert!(element.contains(payment::CARD_NUMBER.name));
            }
            other => panic!("unexpected error: {other}"),
        }
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_member_with_wrong_shipping_city_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        bridge.save(&persisted_user()).unwrap();
        let mut shipping = persisted_user();
        shipping.city = "Kochi".into();
        let driver = storefront(&persisted_user(), &shipping);
        let mut session = session_for(&driver);

        let err = member_checkout(&mut session, &shop(), &bridge, &PaymentCard::test_card())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::AssertionMismatch { ref check, .. } if check == "user details: city"));
        assert!(!driver.was_called(&format!("click:{}", payment::PAY_NOW.selector.key())));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_price_read_twice_is_stable() {
        let driver = storefront(&persisted_user(), &persisted_user());
        let mut session = session_for(&driver);
        let page = ProductDetailPage;

        let first = page.displayed_price(&mut session).await.unwrap();
        let second = page.displayed_price(&mut session).await.unwrap();
        assert_eq!(first, second);
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_price_names_the_step() {
        let driver = MockDriver::new();
        let mut session = session_for(&driver);

        let err = ProductDetailPage.displayed_price(&mut session).await.unwrap_err();

        match err {
            FlowError::PageObjectTimeout { page, operation, element, .. } => {
                assert_eq!(page, "ProductDetailPage");
                assert_eq!(operation, "displayed_price");
                assert!(element.contains(product::PRICE.name));
            }
            other => panic!("unexpected error: {other}"),
        }
        session.close().await.unwrap();
    }
}

mod runner_tests {
    use super::*;

    /// Factory handing out sessions on fresh storefronts, keeping a handle
    /// on each driver
    fn factory(account: PersistedUser, opened: Arc<Mutex<Vec<MockDriver>>>) -> ScenarioRunner {
        ScenarioRunner::new(move || {
            let driver = storefront(&account, &account);
            opened.lock().unwrap().push(driver.clone());
            Ok(session_for(&driver))
        })
    }

    #[tokio::test]
    async fn test_suite_shares_user_through_bridge() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let user = UserGenerator::seeded(21).generate();
        let opened = Arc::new(Mutex::new(Vec::new()));
        let runner = factory(PersistedUser::from(&user), Arc::clone(&opened));

        let scenarios: Vec<Arc<dyn Scenario>> = vec![
            Arc::new(SignupScenario::new(shop(), UserGenerator::seeded(21), bridge.clone())),
            Arc::new(LoginScenario::new(shop(), bridge.clone())),
            Arc::new(GuestCheckoutScenario::new(shop())),
            Arc::new(MemberCheckoutScenario::new(shop(), bridge.clone(), PaymentCard::test_card())),
        ];
        let report = runner.run_suite(&scenarios).await;

        assert!(report.all_passed(), "{}", report.summary());
        assert_eq!(report.total(), 4);
        assert_eq!(bridge.load().unwrap().username, user.username);
        let opened = opened.lock().unwrap();
        assert_eq!(opened.len(), 4);
        assert!(opened.iter().all(MockDriver::is_closed));
    }

    #[tokio::test]
    async fn test_login_before_signup_is_setup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let opened = Arc::new(Mutex::new(Vec::new()));
        let runner = factory(persisted_user(), Arc::clone(&opened));

        let report = runner.run(&LoginScenario::new(shop(), bridge_in(&dir))).await;

        assert_eq!(report.outcome, Outcome::SetupFailed);
        assert!(opened.lock().unwrap()[0].is_closed());
    }

    #[tokio::test]
    async fn test_shipping_mismatch_is_assertion_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_in(&dir);
        let mut saved = persisted_user();
        saved.postal_code = "999999".into();
        bridge.save(&saved).unwrap();

        let opened = Arc::new(Mutex::new(Vec::new()));
        let shown = persisted_user();
        let tracked = Arc::clone(&opened);
        let runner = ScenarioRunner::new(move || {
            let mut account = shown.clone();
            account.postal_code = "999999".into();
            let driver = storefront(&account, &shown);
            tracked.lock().unwrap().push(driver.clone());
            Ok(session_for(&driver))
        });

        let report = runner
            .run(&MemberCheckoutScenario::new(shop(), bridge, PaymentCard::test_card()))
            .await;

        assert_eq!(report.outcome, Outcome::AssertionFailed);
        assert!(report.error.as_deref().unwrap_or_default().contains("postal code"));
        assert!(opened.lock().unwrap()[0].is_closed());
    }
}

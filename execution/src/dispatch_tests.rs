//! Dispatcher precondition and atomicity tests.
//!
//! These exercise the engine end-to-end through encoded instructions: every
//! precondition failure must surface as its typed error and leave every
//! account byte-identical, and every success must commit exactly the staged
//! writes.

#[cfg(test)]
mod tests {
    use crate::mocks::{
        account_id, dashboard_account, decode_state, execute, fresh_account, game_account,
        player_account,
    };
    use crate::{
        AuthorizationError, DecodeError, Engine, EngineError, GameError, ResourceError,
        StateError,
    };
    use matchgrid_types::{Account, Command, Dashboard, GameState, State, StateTag, STATE_LEN};

    const DASH: u8 = 0xD0;
    const GAME: u8 = 0x6A;
    const PLAYER_X: u8 = 0x0A;
    const PLAYER_O: u8 = 0x0B;

    /// Dashboard + waiting game (created at tick 5) + both players.
    fn waiting_game_fixture() -> (Account, Account, Account, Account) {
        let mut accounts = [
            fresh_account(account_id(GAME)),
            dashboard_account(account_id(DASH), 20),
            player_account(account_id(PLAYER_X)),
        ];
        execute(5, &mut accounts, Command::InitGame).expect("init game");
        let [game, dashboard, player_x] = accounts;
        (game, dashboard, player_x, player_account(account_id(PLAYER_O)))
    }

    /// Game fixture advanced past `Join` (tick 6): X to move.
    fn started_game_fixture() -> (Account, Account, Account, Account) {
        let (game, dashboard, player_x, player_o) = waiting_game_fixture();
        let mut accounts = [game, dashboard, player_o];
        execute(6, &mut accounts, Command::Join).expect("join");
        let [game, dashboard, player_o] = accounts;
        (game, dashboard, player_x, player_o)
    }

    #[test]
    fn init_dashboard_tags_the_account() {
        let mut dashboard = fresh_account(account_id(DASH));
        dashboard.signer = true;
        let mut accounts = [dashboard];
        execute(1, &mut accounts, Command::InitDashboard).expect("init");
        assert_eq!(
            decode_state(&accounts[0]),
            State::Dashboard(Dashboard::default())
        );

        // The tag transition is one-shot: a second init is rejected.
        let err = execute(2, &mut accounts, Command::InitDashboard).expect_err("re-init");
        assert!(matches!(
            err,
            EngineError::State(StateError::WrongAccountState {
                index: 0,
                expected: StateTag::Uninitialized,
                got: StateTag::Dashboard,
            })
        ));
    }

    #[test]
    fn init_dashboard_requires_signature() {
        let mut accounts = [fresh_account(account_id(DASH))];
        let before = accounts[0].clone();
        let err = execute(1, &mut accounts, Command::InitDashboard).expect_err("unsigned");
        assert!(matches!(
            err,
            EngineError::Authorization(AuthorizationError::MissingSignature { index: 0 })
        ));
        assert_eq!(accounts[0], before);
    }

    #[test]
    fn init_player_funds_the_player() {
        let mut accounts = [
            dashboard_account(account_id(DASH), 10),
            player_account(account_id(PLAYER_X)),
        ];
        execute(1, &mut accounts, Command::InitPlayer).expect("init player");
        assert_eq!(accounts[0].balance, 9);
        assert_eq!(accounts[1].balance, 1);
    }

    #[test]
    fn init_player_leaves_funded_player_alone() {
        let mut player = player_account(account_id(PLAYER_X));
        player.balance = 5;
        let mut accounts = [dashboard_account(account_id(DASH), 10), player];
        execute(1, &mut accounts, Command::InitPlayer).expect("init player");
        assert_eq!(accounts[0].balance, 10);
        assert_eq!(accounts[1].balance, 5);
    }

    #[test]
    fn init_game_creates_and_funds() {
        let (game, dashboard, player_x, _) = waiting_game_fixture();
        match decode_state(&game) {
            State::Game(game) => {
                assert_eq!(game.state, GameState::Waiting);
                assert_eq!(game.player_x, account_id(PLAYER_X));
                assert!(game.player_o.is_unset());
                assert_eq!(game.keep_alive, [5, 0]);
            }
            other => panic!("unexpected state {other:?}"),
        }
        // One token each for the game account and player X.
        assert_eq!(game.balance, 1);
        assert_eq!(dashboard.balance, 18);
        assert_eq!(player_x.balance, 1);
    }

    #[test]
    fn init_game_rejects_initialized_game_account() {
        let (game, dashboard, player_x, _) = waiting_game_fixture();
        let mut accounts = [game, dashboard, player_x];
        let err = execute(9, &mut accounts, Command::InitGame).expect_err("re-init");
        assert!(matches!(
            err,
            EngineError::State(StateError::WrongAccountState {
                index: 0,
                expected: StateTag::Uninitialized,
                got: StateTag::Game,
            })
        ));
    }

    #[test]
    fn full_match_lifecycle() {
        let mut dashboard = fresh_account(account_id(DASH));
        dashboard.signer = true;
        let mut accounts = [dashboard];
        execute(1, &mut accounts, Command::InitDashboard).expect("init dashboard");
        let [mut dashboard] = accounts;
        // Host funds the dashboard out of band.
        dashboard.balance = 20;

        let mut accounts = [
            fresh_account(account_id(GAME)),
            dashboard,
            player_account(account_id(PLAYER_X)),
        ];
        execute(5, &mut accounts, Command::InitGame).expect("init game");
        let [game, dashboard, player_x] = accounts;

        // Advertise the waiting game.
        let mut accounts = [dashboard, game];
        execute(5, &mut accounts, Command::UpdateDashboard).expect("advertise");
        let [dashboard, game] = accounts;
        match decode_state(&dashboard) {
            State::Dashboard(dashboard) => {
                assert_eq!(dashboard.pending_game, account_id(GAME));
                assert_eq!(dashboard.total_games, 0);
            }
            other => panic!("unexpected state {other:?}"),
        }

        let mut accounts = [game, dashboard, player_account(account_id(PLAYER_O))];
        execute(6, &mut accounts, Command::Join).expect("join");
        let [game, dashboard, player_o] = accounts;

        // X takes the left column; O fills the middle column.
        let moves = [
            (player_x.clone(), 0u8, 0u8),
            (player_o.clone(), 1, 0),
            (player_x.clone(), 0, 1),
            (player_o.clone(), 1, 1),
            (player_x.clone(), 0, 2),
        ];
        let mut game = game;
        let mut dashboard = dashboard;
        for (tick, (actor, x, y)) in moves.into_iter().enumerate() {
            let mut accounts = [game, dashboard, actor];
            execute(7 + tick as u64, &mut accounts, Command::Move { x, y }).expect("move");
            [game, dashboard, _] = accounts;
        }
        match decode_state(&game) {
            State::Game(game) => assert_eq!(game.state, GameState::XWon),
            other => panic!("unexpected state {other:?}"),
        }

        // Terminal game: further moves are rejected and nothing changes.
        let mut accounts = [game, dashboard, player_o];
        let before = accounts[0].clone();
        let err = execute(20, &mut accounts, Command::Move { x: 2, y: 2 }).expect_err("finished");
        assert!(matches!(
            err,
            EngineError::State(StateError::Game(GameError::NotYourTurn))
        ));
        assert_eq!(accounts[0], before);
        let [game, dashboard, _] = accounts;

        // Fold the result into the dashboard.
        let mut accounts = [dashboard, game];
        execute(21, &mut accounts, Command::UpdateDashboard).expect("record result");
        match decode_state(&accounts[0]) {
            State::Dashboard(dashboard) => {
                assert_eq!(dashboard.total_games, 1);
                assert!(dashboard.completed_games.contains(&account_id(GAME)));
            }
            other => panic!("unexpected state {other:?}"),
        }

        // InitGame moved 2 tokens, Join 1; move actors were already funded.
        assert_eq!(accounts[0].balance, 17);
    }

    #[test]
    fn join_requires_signature() {
        let (game, dashboard, _, mut player_o) = waiting_game_fixture();
        player_o.signer = false;
        let mut accounts = [game, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("unsigned");
        assert!(matches!(
            err,
            EngineError::Authorization(AuthorizationError::MissingSignature { index: 2 })
        ));
    }

    #[test]
    fn join_requires_three_accounts() {
        let (game, dashboard, _, _) = waiting_game_fixture();
        let mut accounts = [game, dashboard];
        let err = execute(6, &mut accounts, Command::Join).expect_err("missing actor");
        assert!(matches!(
            err,
            EngineError::Decode(DecodeError::NotEnoughAccounts {
                required: 3,
                got: 2,
            })
        ));
    }

    #[test]
    fn game_role_rejects_dashboard_tag() {
        let (_, dashboard, _, player_o) = waiting_game_fixture();
        let second_dashboard = dashboard_account(account_id(0xD1), 0);
        let mut accounts = [second_dashboard, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("wrong tag");
        assert!(matches!(
            err,
            EngineError::State(StateError::WrongAccountState {
                index: 0,
                expected: StateTag::Game,
                got: StateTag::Dashboard,
            })
        ));
    }

    #[test]
    fn update_dashboard_rejects_swapped_roles() {
        let (game, dashboard, _, _) = waiting_game_fixture();
        let mut accounts = [game, dashboard];
        let err = execute(6, &mut accounts, Command::UpdateDashboard).expect_err("swapped");
        assert!(matches!(
            err,
            EngineError::State(StateError::WrongAccountState {
                index: 0,
                expected: StateTag::Dashboard,
                got: StateTag::Game,
            })
        ));
    }

    #[test]
    fn counterparty_owner_must_match() {
        let (game, dashboard, _, mut player_o) = waiting_game_fixture();
        player_o.owner = account_id(0x99);
        let mut accounts = [game, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("foreign owner");
        assert!(matches!(
            err,
            EngineError::Authorization(AuthorizationError::InvalidCounterparty {
                index: 2,
                ..
            })
        ));

        let (mut game, dashboard, _, player_o) = waiting_game_fixture();
        game.owner = account_id(0x99);
        let mut accounts = [game, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("foreign game");
        assert!(matches!(
            err,
            EngineError::Authorization(AuthorizationError::InvalidCounterparty {
                index: 0,
                ..
            })
        ));
    }

    #[test]
    fn counterparty_buffer_must_be_empty() {
        let (game, dashboard, _, mut player_o) = waiting_game_fixture();
        player_o.data = vec![0u8; 8];
        let mut accounts = [game, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("stateful player");
        assert!(matches!(
            err,
            EngineError::Authorization(AuthorizationError::InvalidCounterparty {
                index: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_instructions() {
        let engine = Engine::new(1);
        let mut accounts: [Account; 0] = [];
        let err = engine
            .execute(&mut accounts, &[9, 0, 0, 0])
            .expect_err("unknown discriminant");
        assert!(matches!(
            err,
            EngineError::Decode(DecodeError::Instruction(_))
        ));
        let err = engine
            .execute(&mut accounts, &[0, 0])
            .expect_err("truncated instruction");
        assert!(matches!(
            err,
            EngineError::Decode(DecodeError::Instruction(_))
        ));
    }

    #[test]
    fn rejects_short_account_buffers() {
        let (mut game, dashboard, _, player_o) = waiting_game_fixture();
        game.data.truncate(STATE_LEN - 1);
        let mut accounts = [game, dashboard, player_o];
        let err = execute(6, &mut accounts, Command::Join).expect_err("short buffer");
        assert!(matches!(
            err,
            EngineError::Decode(DecodeError::BufferTooShort {
                index: 0,
                len,
                need: STATE_LEN,
            }) if len == STATE_LEN - 1
        ));
    }

    #[test]
    fn failed_transition_commits_nothing() {
        let (game, dashboard, _, player_o) = started_game_fixture();
        // O out of turn: the transition fails and every account is untouched.
        let before = [game.clone(), dashboard.clone(), player_o.clone()];
        let mut accounts = [game, dashboard, player_o];
        let err = execute(7, &mut accounts, Command::Move { x: 0, y: 0 }).expect_err("out of turn");
        assert!(matches!(
            err,
            EngineError::State(StateError::Game(GameError::WrongPlayer))
        ));
        assert_eq!(accounts, before);
    }

    #[test]
    fn funding_failure_aborts_the_transition() {
        let (game, mut dashboard, player_x, _) = started_game_fixture();
        dashboard.balance = 1;
        let mut player_x = player_x;
        player_x.balance = 0;
        let before = [game.clone(), dashboard.clone(), player_x.clone()];
        let mut accounts = [game, dashboard, player_x];
        let err = execute(7, &mut accounts, Command::Move { x: 0, y: 0 }).expect_err("drained");
        assert!(matches!(
            err,
            EngineError::Resource(ResourceError::InsufficientFunds { balance: 1 })
        ));
        // The valid move must not land either: all-or-nothing.
        assert_eq!(accounts, before);
    }

    #[test]
    fn game_commands_fund_the_actor() {
        let (game, dashboard, _, player_o) = waiting_game_fixture();
        assert_eq!(player_o.balance, 0);
        let mut accounts = [game, dashboard, player_o];
        execute(6, &mut accounts, Command::Join).expect("join");
        assert_eq!(accounts[1].balance, 17);
        assert_eq!(accounts[2].balance, 1);

        // An already-funded actor is left alone.
        let mut accounts = [
            accounts[0].clone(),
            accounts[1].clone(),
            accounts[2].clone(),
        ];
        let player_x = {
            let mut player = player_account(account_id(PLAYER_X));
            player.balance = 3;
            player
        };
        accounts[2] = player_x;
        execute(7, &mut accounts, Command::Move { x: 0, y: 0 }).expect("move");
        assert_eq!(accounts[1].balance, 17);
        assert_eq!(accounts[2].balance, 3);
    }

    #[test]
    fn keep_alive_enforces_monotonic_ticks() {
        let (game, dashboard, player_x, _) = started_game_fixture();
        let mut accounts = [game, dashboard, player_x];
        execute(10, &mut accounts, Command::KeepAlive).expect("keep alive");
        match decode_state(&accounts[0]) {
            State::Game(game) => assert_eq!(game.keep_alive[0], 10),
            other => panic!("unexpected state {other:?}"),
        }

        let before = accounts[0].clone();
        let err = execute(10, &mut accounts, Command::KeepAlive).expect_err("replayed tick");
        assert!(matches!(
            err,
            EngineError::State(StateError::Game(GameError::StaleClock {
                tick: 10,
                last: 10,
            }))
        ));
        assert_eq!(accounts[0], before);
    }

    #[test]
    fn extra_trailing_accounts_are_tolerated() {
        let (game, dashboard, _, player_o) = waiting_game_fixture();
        let mut accounts = [game, dashboard, player_o, player_account(account_id(0x42))];
        execute(6, &mut accounts, Command::Join).expect("join");
        // The extra account is neither validated nor funded.
        assert_eq!(accounts[3].balance, 0);
    }
}

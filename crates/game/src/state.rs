//! Game state machine.
//!
//! Drives the phase sequence: two value draws, the high/low draw, the role
//! permutation, one target draw per customer, then round-robin quoting.
//! Player quotes feed the matching engine; fills update positions; terminal
//! returns settle everything against the realized contract value.

use market::Market;
use tracing::debug;
use types::{
    ActionId, Actor, Fill, GameConfig, MoveNumber, OrderEntry, OrderId, OrderSide, Phase, PlayerId,
    PlayerPosition, Price, Quote, RoleAssignment, StructuredAction,
};

use crate::codec::ActionCodec;
use crate::error::{GameError, Result};

/// One game in progress.
///
/// The configuration is inlined so a state never refers back to its game
/// object; cloning yields a fully independent copy, order book included.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) codec: ActionCodec,
    pub(crate) history: Vec<ActionId>,
    pub(crate) contract_values: [Price; 2],
    pub(crate) high_settle: bool,
    pub(crate) roles: Option<RoleAssignment>,
    pub(crate) target_positions: Vec<i64>,
    pub(crate) positions: Vec<PlayerPosition>,
    pub(crate) quotes: Vec<(PlayerId, Quote)>,
    pub(crate) fills: Vec<Fill>,
    pub(crate) market: Market,
}

impl GameState {
    /// Fresh state at move 0.
    pub fn new(config: GameConfig) -> Self {
        let num_players = config.num_players;
        Self {
            codec: ActionCodec::new(config),
            history: Vec::new(),
            contract_values: [Price::ZERO; 2],
            high_settle: false,
            roles: None,
            target_positions: vec![0; num_players],
            positions: vec![PlayerPosition::default(); num_players],
            quotes: Vec::new(),
            fills: Vec::new(),
            market: Market::new(),
        }
    }

    /// The configuration this game runs under.
    pub fn config(&self) -> &GameConfig {
        self.codec.config()
    }

    /// The codec for this configuration.
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// Number of actions applied so far.
    pub fn move_number(&self) -> MoveNumber {
        self.history.len()
    }

    /// Raw actions applied so far.
    pub fn history(&self) -> &[ActionId] {
        &self.history
    }

    /// Phase of the upcoming move.
    pub fn phase(&self) -> Phase {
        self.codec.phase_of(self.move_number())
    }

    /// Whether the game is over.
    pub fn is_terminal(&self) -> bool {
        self.move_number() == self.config().total_moves()
    }

    /// Who acts next.
    pub fn current_player(&self) -> Actor {
        if self.is_terminal() {
            return Actor::Terminal;
        }
        let move_number = self.move_number();
        let chance_moves = self.config().chance_moves();
        if move_number < chance_moves {
            Actor::Chance
        } else {
            Actor::Player(PlayerId(
                (move_number - chance_moves) % self.config().num_players,
            ))
        }
    }

    /// Whether a chance node resolves the next move.
    pub fn is_chance_node(&self) -> bool {
        matches!(self.current_player(), Actor::Chance)
    }

    /// Every legal raw action at the current move; empty at terminal.
    pub fn legal_actions(&self) -> Vec<ActionId> {
        match self.codec.action_range(self.phase()) {
            Ok((min, max)) => (min..=max).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Uniform distribution over the current chance range.
    pub fn chance_outcomes(&self) -> Result<Vec<(ActionId, f64)>> {
        if !self.is_chance_node() {
            return Err(GameError::NotChanceNode);
        }
        let (min, max) = self.codec.action_range(self.phase())?;
        let probability = 1.0 / (max - min + 1) as f64;
        Ok((min..=max).map(|action| (action, probability)).collect())
    }

    /// Apply one raw action and advance the move counter.
    pub fn apply_action(&mut self, action: ActionId) -> Result<()> {
        let move_number = self.move_number();
        let phase = self.codec.phase_of(move_number);
        let structured = self.codec.decode(phase, action)?;
        debug!(move_number, %phase, action, "apply");

        match structured {
            StructuredAction::ContractValue { value } => {
                self.contract_values[move_number] = value;
            }
            StructuredAction::HighLow { is_high } => {
                self.high_settle = is_high;
            }
            StructuredAction::Permutation(assignment) => {
                self.roles = Some(assignment);
            }
            StructuredAction::CustomerTarget { size } => {
                let assignment = self
                    .roles
                    .as_ref()
                    .ok_or(GameError::PhaseMismatch { phase })?;
                // The k-th target draw belongs to the customer at slot 3 + k.
                let customer = assignment.player_at(3 + (move_number - 4));
                self.target_positions[customer.0] = size;
            }
            StructuredAction::Quote(quote) => {
                self.apply_quote(move_number, quote)?;
            }
        }
        self.history.push(action);
        Ok(())
    }

    /// Undo the last action by replaying the rest of the history.
    ///
    /// The order book is a function of the whole action sequence, so a
    /// stack-pop undo would desynchronize it; replay is the only safe route.
    pub fn undo_last_action(&mut self) -> Result<()> {
        let mut history = std::mem::take(&mut self.history);
        if history.pop().is_none() {
            return Err(GameError::EmptyHistory);
        }
        *self = GameState::new(*self.config());
        for action in history {
            self.apply_action(action)?;
        }
        Ok(())
    }

    /// Realized contract value: the high or low candidate per the draw.
    pub fn settlement_value(&self) -> Result<Price> {
        if self.move_number() < 3 {
            return Err(GameError::SettlementPending);
        }
        let [first, second] = self.contract_values;
        Ok(if self.high_settle {
            first.max(second)
        } else {
            first.min(second)
        })
    }

    /// Terminal utility of every player.
    ///
    /// Positions settle at the realized value; a player with a target is
    /// additionally charged `|target − contracts| · max_contract_value`.
    pub fn returns(&self) -> Result<Vec<f64>> {
        if !self.is_terminal() {
            return Err(GameError::NotTerminal);
        }
        let settlement = self.settlement_value()?;
        let penalty_slope = self.config().max_contract_value as f64;
        Ok(self
            .positions
            .iter()
            .zip(&self.target_positions)
            .map(|(position, &target)| {
                let mut value = position.value_at(settlement) as f64;
                if target != 0 {
                    value -= (target - position.contracts).abs() as f64 * penalty_slope;
                }
                value
            })
            .collect())
    }

    /// Human-readable rendering of a raw action at the current phase.
    pub fn action_to_string(&self, actor: Actor, action: ActionId) -> Result<String> {
        let structured = self.codec.decode(self.phase(), action)?;
        Ok(format!("{} {}", actor, structured))
    }

    /// Per-player positions in seat order.
    pub fn positions(&self) -> &[PlayerPosition] {
        &self.positions
    }

    /// Target position of one player; zero for non-customers.
    pub fn target_position(&self, player: PlayerId) -> Result<i64> {
        self.check_player(player)?;
        Ok(self.target_positions[player.0])
    }

    /// Role assignment, once the permutation has been drawn.
    pub fn roles(&self) -> Option<&RoleAssignment> {
        self.roles.as_ref()
    }

    /// Append-only quote log as `(player, quote)` pairs.
    pub fn quotes(&self) -> &[(PlayerId, Quote)] {
        &self.quotes
    }

    /// Append-only fill log.
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// The live order book.
    pub fn market(&self) -> &Market {
        &self.market
    }

    pub(crate) fn check_player(&self, player: PlayerId) -> Result<()> {
        if player.0 < self.config().num_players {
            Ok(())
        } else {
            Err(GameError::InvalidPlayer(player))
        }
    }

    fn apply_quote(&mut self, move_number: MoveNumber, quote: Quote) -> Result<()> {
        let chance_moves = self.config().chance_moves();
        let player = PlayerId((move_number - chance_moves) % self.config().num_players);
        self.quotes.push((player, quote));

        // Bid before ask with ids 2m and 2m+1: every order gets a unique id
        // and a player's bid outranks its own ask in time priority.
        let bid = OrderEntry::new(
            quote.bid_price,
            quote.bid_size,
            OrderId(2 * move_number as u64),
            player,
            OrderSide::Buy,
        );
        let mut fills = self.market.add_order(bid)?;
        let ask = OrderEntry::new(
            quote.ask_price,
            quote.ask_size,
            OrderId(2 * move_number as u64 + 1),
            player,
            OrderSide::Sell,
        );
        fills.extend(self.market.add_order(ask)?);

        for fill in fills {
            self.apply_fill(&fill);
            self.fills.push(fill);
        }
        Ok(())
    }

    fn apply_fill(&mut self, fill: &Fill) {
        let contracts = fill.quantity.raw() as i64;
        let cash = fill.value();
        let (buyer, seller) = if fill.aggressor_bought() {
            (fill.aggressor_id, fill.resting_id)
        } else {
            (fill.resting_id, fill.aggressor_id)
        };
        self.positions[buyer.0].contracts += contracts;
        self.positions[buyer.0].cash -= cash;
        self.positions[seller.0].contracts -= contracts;
        self.positions[seller.0].cash += cash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Cash, Quantity, Role};

    /// Defaults used by the scripted scenarios: 4 players, 2 steps each,
    /// quote sizes up to 2, targets up to ±3, prices in [1, 30].
    fn small_config() -> GameConfig {
        GameConfig::default()
            .with_players(4)
            .with_steps_per_player(2)
            .with_max_contracts_per_trade(2)
            .with_customer_max_size(3)
            .with_max_contract_value(30)
    }

    fn new_state() -> GameState {
        GameState::new(small_config())
    }

    /// Apply the five chance moves: values 5 and 25, the given settlement
    /// direction, the given permutation rank, customer target +2.
    fn apply_chance(state: &mut GameState, is_high: bool, permutation_rank: ActionId) {
        let codec = *state.codec();
        state
            .apply_action(codec.contract_value_action(5).unwrap())
            .unwrap();
        state
            .apply_action(codec.contract_value_action(25).unwrap())
            .unwrap();
        state.apply_action(codec.high_low_action(is_high)).unwrap();
        state.apply_action(permutation_rank).unwrap();
        state
            .apply_action(codec.customer_target_action(2).unwrap())
            .unwrap();
    }

    fn quote(state: &GameState, bid_price: i64, bid_size: u64, ask_price: i64, ask_size: u64) -> ActionId {
        state
            .codec()
            .quote_action(bid_price, bid_size, ask_price, ask_size)
            .unwrap()
    }

    /// Quote that rests nothing: both sides size zero.
    fn empty_quote(state: &GameState) -> ActionId {
        quote(state, 1, 0, 30, 0)
    }

    #[test]
    fn chance_then_round_robin_turn_order() {
        let mut state = new_state();
        assert_eq!(state.current_player(), Actor::Chance);
        apply_chance(&mut state, true, 21);

        for expected in [0, 1, 2, 3, 0, 1, 2, 3] {
            assert_eq!(state.current_player(), Actor::Player(PlayerId(expected)));
            let action = empty_quote(&state);
            state.apply_action(action).unwrap();
        }
        assert_eq!(state.current_player(), Actor::Terminal);
        assert!(state.is_terminal());
    }

    #[test]
    fn permutation_draw_assigns_roles_and_target() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        // Rank 21 decodes to [3, 1, 2, 0].
        let roles = state.roles().unwrap();
        assert_eq!(roles.role_of(PlayerId(0)), Role::Customer);
        assert_eq!(roles.role_of(PlayerId(1)), Role::ValueCheater);
        assert_eq!(roles.role_of(PlayerId(2)), Role::HighLowCheater);
        assert_eq!(roles.role_of(PlayerId(3)), Role::ValueCheater);

        // The single customer draw lands on the player at slot 3.
        assert_eq!(state.target_position(PlayerId(0)).unwrap(), 2);
        for player in 1..4 {
            assert_eq!(state.target_position(PlayerId(player)).unwrap(), 0);
        }
    }

    #[test]
    fn simple_cross_at_ask() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        let p0 = quote(&state, 1, 1, 30, 1);
        state.apply_action(p0).unwrap();
        let p1 = quote(&state, 2, 1, 29, 1);
        state.apply_action(p1).unwrap();
        assert!(state.fills().is_empty());

        // P2 lifts P1's resting ask at 29.
        let p2 = quote(&state, 29, 1, 30, 1);
        state.apply_action(p2).unwrap();

        assert_eq!(state.fills().len(), 1);
        let fill = state.fills()[0];
        assert_eq!(fill.price, 29);
        assert_eq!(fill.quantity, Quantity(1));
        assert_eq!(fill.resting_id, PlayerId(1));
        assert_eq!(fill.aggressor_id, PlayerId(2));

        assert_eq!(state.positions()[1].contracts, -1);
        assert_eq!(state.positions()[1].cash, Cash(29));
        assert_eq!(state.positions()[2].contracts, 1);
        assert_eq!(state.positions()[2].cash, Cash(-29));
        assert_eq!(state.positions()[0], PlayerPosition::default());
        assert_eq!(state.positions()[3], PlayerPosition::default());
    }

    #[test]
    fn zero_size_quote_rests_nothing() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        let action = quote(&state, 15, 0, 16, 0);
        state.apply_action(action).unwrap();

        assert!(state.fills().is_empty());
        assert!(state.market().is_empty());
        assert_eq!(state.quotes().len(), 1);
    }

    #[test]
    fn partial_fill_leaves_residual_bid() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        // P0 rests an ask of 1 @ 10; P1 bids 2 @ 12.
        state.apply_action(quote(&state, 1, 0, 10, 1)).unwrap();
        state.apply_action(quote(&state, 12, 2, 30, 0)).unwrap();

        assert_eq!(state.fills().len(), 1);
        assert_eq!(state.fills()[0].price, 10);
        assert_eq!(state.fills()[0].quantity, Quantity(1));

        let residual = state.market().best_bid().unwrap();
        assert_eq!(residual.price, 12);
        assert_eq!(residual.quantity, Quantity(1));
        assert_eq!(residual.owner, PlayerId(1));
    }

    #[test]
    fn time_priority_between_equal_asks() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        state.apply_action(quote(&state, 1, 0, 10, 1)).unwrap(); // P0 ask
        state.apply_action(quote(&state, 1, 0, 10, 1)).unwrap(); // P1 ask
        state.apply_action(quote(&state, 12, 2, 30, 0)).unwrap(); // P2 buys both

        assert_eq!(state.fills().len(), 2);
        assert_eq!(state.fills()[0].resting_id, PlayerId(0));
        assert_eq!(state.fills()[1].resting_id, PlayerId(1));
        assert_eq!(state.fills()[0].price, 10);
        assert_eq!(state.fills()[1].price, 10);
    }

    #[test]
    fn returns_settle_high_with_customer_penalty() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        state.apply_action(quote(&state, 1, 1, 30, 1)).unwrap();
        state.apply_action(quote(&state, 2, 1, 29, 1)).unwrap();
        state.apply_action(quote(&state, 29, 1, 30, 1)).unwrap();
        for _ in 0..5 {
            let action = empty_quote(&state);
            state.apply_action(action).unwrap();
        }
        assert!(state.is_terminal());

        // Settlement = max(5, 25) = 25. P1 sold one at 29, P2 bought one.
        // P0 is the customer with target +2 and no contracts: penalty 60.
        let returns = state.returns().unwrap();
        assert_eq!(returns[0], -60.0);
        assert_eq!(returns[1], 29.0 - 25.0);
        assert_eq!(returns[2], 25.0 - 29.0);
        assert_eq!(returns[3], 0.0);
    }

    #[test]
    fn returns_settle_low() {
        let mut state = new_state();
        // Trivial permutation: P3 is the only customer (slot 3).
        let rank = state.codec().permutation_action(vec![0, 1, 2, 3]).unwrap();
        apply_chance(&mut state, false, rank);

        // P0 rests an ask at 25; P1 buys one contract there.
        state.apply_action(quote(&state, 1, 0, 25, 1)).unwrap();
        state.apply_action(quote(&state, 25, 1, 30, 0)).unwrap();
        for _ in 0..6 {
            let action = empty_quote(&state);
            state.apply_action(action).unwrap();
        }

        // Settlement = min(5, 25) = 5: holding +1 bought at 25 nets −20.
        let returns = state.returns().unwrap();
        assert_eq!(returns[1], -20.0);
        assert_eq!(returns[0], 20.0);
        // P3 missed its +2 target with no trades at all.
        assert_eq!(returns[3], -60.0);
    }

    #[test]
    fn trading_conserves_cash_and_contracts() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        let script = [
            (10, 2, 11, 1),
            (11, 1, 12, 2),
            (9, 2, 10, 2),
            (12, 2, 13, 1),
            (8, 1, 9, 1),
            (13, 2, 14, 2),
            (7, 0, 8, 2),
            (14, 1, 15, 1),
        ];
        for (bid_price, bid_size, ask_price, ask_size) in script {
            let action = quote(&state, bid_price, bid_size, ask_price, ask_size);
            state.apply_action(action).unwrap();
        }
        assert!(state.is_terminal());
        assert!(!state.fills().is_empty());

        let contracts: i64 = state.positions().iter().map(|p| p.contracts).sum();
        let cash: i64 = state.positions().iter().map(|p| p.cash.raw()).sum();
        assert_eq!(contracts, 0);
        assert_eq!(cash, 0);
    }

    #[test]
    fn chance_outcomes_are_uniform() {
        let state = new_state();
        let outcomes = state.chance_outcomes().unwrap();
        assert_eq!(outcomes.len(), 30);
        let total: f64 = outcomes.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(outcomes.iter().all(|&(_, p)| (p - 1.0 / 30.0).abs() < 1e-12));
    }

    #[test]
    fn host_misuse_is_a_typed_error() {
        let mut state = new_state();
        assert_eq!(state.returns(), Err(GameError::NotTerminal));
        assert_eq!(state.settlement_value(), Err(GameError::SettlementPending));

        apply_chance(&mut state, true, 21);
        assert_eq!(state.chance_outcomes(), Err(GameError::NotChanceNode));

        for _ in 0..8 {
            let action = empty_quote(&state);
            state.apply_action(action).unwrap();
        }
        assert!(state.is_terminal());
        assert!(state.legal_actions().is_empty());
        assert_eq!(
            state.apply_action(0),
            Err(GameError::PhaseMismatch {
                phase: Phase::Terminal
            })
        );
    }

    #[test]
    fn apply_rejects_out_of_range_action() {
        let mut state = new_state();
        let result = state.apply_action(30);
        assert_eq!(
            result,
            Err(GameError::InvalidAction {
                phase: Phase::ChanceValue,
                action: 30,
                max: 29
            })
        );
        // The failed apply left the state untouched.
        assert_eq!(state.move_number(), 0);
    }

    #[test]
    fn undo_replays_to_the_same_state() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);
        state.apply_action(quote(&state, 1, 1, 30, 1)).unwrap();
        state.apply_action(quote(&state, 2, 1, 29, 1)).unwrap();

        let before = state.clone();
        state.apply_action(quote(&state, 29, 1, 30, 1)).unwrap();
        assert!(!state.fills().is_empty());

        state.undo_last_action().unwrap();
        assert_eq!(state.history(), before.history());
        assert_eq!(state.positions(), before.positions());
        assert_eq!(state.fills(), before.fills());
        assert_eq!(state.market().to_string(), before.market().to_string());
    }

    #[test]
    fn undo_on_fresh_state_fails() {
        let mut state = new_state();
        assert_eq!(state.undo_last_action(), Err(GameError::EmptyHistory));
    }

    #[test]
    fn clone_is_independent() {
        let mut state = new_state();
        apply_chance(&mut state, true, 21);

        let snapshot = state.clone();
        state.apply_action(quote(&state, 1, 1, 30, 1)).unwrap();

        assert_eq!(snapshot.move_number(), 5);
        assert_eq!(state.move_number(), 6);
        assert!(snapshot.market().is_empty());
        assert!(!state.market().is_empty());
    }

    #[test]
    fn action_to_string_names_the_actor() {
        let state = new_state();
        let text = state.action_to_string(Actor::Chance, 4).unwrap();
        assert!(text.contains("Chance"));
        assert!(text.contains('5'));
    }
}

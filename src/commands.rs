use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::{error, info, warn};
use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;

use crate::bet::{BetSlip, BetType};
use crate::config::Config;
use crate::error::TableError;
use crate::resolver::RoundResult;
use crate::roulette::{Roulette, WinningNumber};
use crate::store::TableStore;
use crate::table::Table;

type Context<'a> = poise::Context<'a, Data, anyhow::Error>;

const CURRENCY: &str = "tugriks";

pub struct Data {
    pub table: Arc<RwLock<Table>>,
    pub store: TableStore,
    pub config: Config,
}

impl Data {
    async fn new(config: Config) -> Result<Self> {
        let store = TableStore::new(config.table_file.clone());
        let table = store.load().await?;
        info!(
            "loaded table with {} players from {}",
            table.players().len(),
            store.path().display()
        );
        Ok(Self {
            table: Arc::new(RwLock::new(table)),
            store,
            config,
        })
    }

    /// Holds the table exclusively while writing so an older snapshot can never
    /// land after a newer one.
    async fn save_table(&self) -> Result<()> {
        let table = self.table.write().await;
        self.store.save(&table).await
    }
}

struct Prize {
    name: &'static str,
    emoji: &'static str,
    description: &'static str,
    price: u64,
}

const PRIZES: [Prize; 3] = [
    Prize {
        name: "Aveo, the best car in the world",
        emoji: "🏆",
        description: "The legendary Chevrolet Aveo.",
        price: 5_000_000,
    },
    Prize {
        name: "Dream house",
        emoji: "🏰",
        description: "A luxurious mansion for true winners.",
        price: 10_000_000,
    },
    Prize {
        name: "Luxury yacht",
        emoji: "⛵",
        description: "An exclusive yacht for cruising the world.",
        price: 25_000_000,
    },
];

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum Area {
    #[name = "Red"]
    Red,
    #[name = "Black"]
    Black,
    #[name = "Green (0)"]
    Green,
    #[name = "Even"]
    Even,
    #[name = "Odd"]
    Odd,
    #[name = "1-18"]
    Low,
    #[name = "19-36"]
    High,
}

impl From<Area> for BetType {
    fn from(area: Area) -> Self {
        match area {
            Area::Red => BetType::Red,
            Area::Black => BetType::Black,
            Area::Green => BetType::Green,
            Area::Even => BetType::Even,
            Area::Odd => BetType::Odd,
            Area::Low => BetType::Low,
            Area::High => BetType::High,
        }
    }
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum Chip {
    #[name = "10"]
    Ten,
    #[name = "50"]
    Fifty,
    #[name = "100"]
    Hundred,
    #[name = "500"]
    FiveHundred,
    #[name = "1000"]
    Thousand,
}

impl Chip {
    fn value(self) -> u64 {
        match self {
            Chip::Ten => 10,
            Chip::Fifty => 50,
            Chip::Hundred => 100,
            Chip::FiveHundred => 500,
            Chip::Thousand => 1000,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

fn format_number(number: WinningNumber) -> String {
    format!("{} {}", number.color().emoji(), number)
}

fn format_slip(slip: &BetSlip) -> String {
    if slip.is_empty() {
        return "No bets placed.".to_string();
    }
    let lines: Vec<String> = slip
        .bets()
        .iter()
        .map(|bet| {
            format!(
                "{}: {} (pays x{})",
                bet.bet_type(),
                bet.amount(),
                bet.bet_type().multiplier()
            )
        })
        .collect();
    format!("{}\nTotal bet: {} {}", lines.join("\n"), slip.total(), CURRENCY)
}

fn format_round(result: &RoundResult, balance: u64) -> String {
    let lines: Vec<String> = result
        .outcomes
        .iter()
        .map(|outcome| {
            if outcome.won {
                format!(
                    "✅ {} {} → +{}",
                    outcome.bet.bet_type(),
                    outcome.bet.amount(),
                    outcome.payout
                )
            } else {
                format!("❌ {} {}", outcome.bet.bet_type(), outcome.bet.amount())
            }
        })
        .collect();
    let headline = if result.won_any() {
        format!("You win {} {}!", result.total_payout, CURRENCY)
    } else {
        "No luck this time.".to_string()
    };
    format!(
        "The ball lands on **{}**\n{}\n{}\nBalance: {} {}",
        format_number(result.winning_number),
        lines.join("\n"),
        headline,
        balance,
        CURRENCY
    )
}

/// Takes a seat at the roulette table
#[poise::command(slash_command, prefix_command)]
async fn join(ctx: Context<'_>) -> Result<()> {
    let author = ctx.author();
    let balance = {
        let mut table = ctx.data().table.write().await;
        table.join(author.id.get(), &author.name, now_millis()).balance
    };
    ctx.data().save_table().await?;
    ctx.say(format!(
        "Welcome to the table, {}! Your balance is {} {}.",
        author.name, balance, CURRENCY
    ))
    .await?;
    Ok(())
}

/// Leaves the table, returning any pending bets
#[poise::command(slash_command, prefix_command)]
async fn leave(ctx: Context<'_>) -> Result<()> {
    let left = ctx.data().table.write().await.leave(ctx.author().id.get());
    match left {
        Ok(player) => {
            ctx.data().save_table().await?;
            ctx.say(format!(
                "{} left the table with {} {}.",
                player.username, player.balance, CURRENCY
            ))
            .await?;
        }
        Err(why) => {
            ctx.say(why.to_string()).await?;
        }
    }
    Ok(())
}

/// Places a chip on a betting area
#[poise::command(slash_command, prefix_command)]
async fn bet(
    ctx: Context<'_>,
    #[description = "Betting area"] area: Area,
    #[description = "Chip value"] chip: Chip,
) -> Result<()> {
    let id = ctx.author().id.get();
    let placed = ctx
        .data()
        .table
        .write()
        .await
        .place_bet(id, area.into(), chip.value(), now_millis())
        .map(|player| (format_slip(&player.bets), player.balance));
    match placed {
        Ok((slip, balance)) => {
            ctx.data().save_table().await?;
            ctx.say(format!("{}\nBalance: {} {}", slip, balance, CURRENCY))
                .await?;
        }
        Err(why) => {
            ctx.say(why.to_string()).await?;
        }
    }
    Ok(())
}

/// Shows your pending bets
#[poise::command(slash_command, prefix_command)]
async fn bets(ctx: Context<'_>) -> Result<()> {
    let response = match ctx.data().table.read().await.player(ctx.author().id.get()) {
        Some(player) => format_slip(&player.bets),
        None => TableError::NotSeated.to_string(),
    };
    ctx.say(response).await?;
    Ok(())
}

/// Takes back all pending bets
#[poise::command(slash_command, prefix_command)]
async fn clear(ctx: Context<'_>) -> Result<()> {
    let cleared = ctx
        .data()
        .table
        .write()
        .await
        .clear_bets(ctx.author().id.get(), now_millis());
    match cleared {
        Ok(refund) => {
            ctx.data().save_table().await?;
            ctx.say(format!("Bets cleared, {} {} returned.", refund, CURRENCY))
                .await?;
        }
        Err(why) => {
            ctx.say(why.to_string()).await?;
        }
    }
    Ok(())
}

async fn announce_spin(ctx: Context<'_>) -> Result<()> {
    ctx.data().save_table().await?;
    // The reply deadline is shorter than a spin.
    ctx.defer().await?;
    Ok(())
}

/// Spins the wheel and settles your bets
#[poise::command(slash_command, prefix_command)]
async fn spin(ctx: Context<'_>) -> Result<()> {
    let id = ctx.author().id.get();
    let begun = ctx.data().table.write().await.begin_spin(id, now_millis());
    if let Err(why) = begun {
        ctx.say(why.to_string()).await?;
        return Ok(());
    }
    if let Err(why) = announce_spin(ctx).await {
        let refund = ctx.data().table.write().await.abort_spin(id);
        warn!("spin for {} aborted ({:?}): {:?}", id, refund, why);
        if let Err(save_error) = ctx.data().save_table().await {
            error!("saving after an aborted spin failed: {:?}", save_error);
        }
        return Err(why);
    }
    tokio::time::sleep(ctx.data().config.spin_delay).await;

    let number = Roulette::new().draw();
    let (result, balance) = {
        let mut table = ctx.data().table.write().await;
        let result = table.finish_spin(id, number)?;
        let balance = table.player(id).map(|player| player.balance).unwrap_or_default();
        (result, balance)
    };
    ctx.data().save_table().await?;
    ctx.say(format_round(&result, balance)).await?;
    Ok(())
}

/// Shows your balance
#[poise::command(slash_command, prefix_command)]
async fn balance(ctx: Context<'_>) -> Result<()> {
    let response = match ctx.data().table.read().await.player(ctx.author().id.get()) {
        Some(player) => format!(
            "Balance: {} {} (on the table: {})",
            player.balance,
            CURRENCY,
            player.bets.total()
        ),
        None => TableError::NotSeated.to_string(),
    };
    ctx.say(response).await?;
    Ok(())
}

/// Shows the last winning numbers
#[poise::command(slash_command, prefix_command)]
async fn history(ctx: Context<'_>) -> Result<()> {
    let response = {
        let table = ctx.data().table.read().await;
        if table.history().is_empty() {
            "The wheel has not been spun yet.".to_string()
        } else {
            let numbers: Vec<String> = table.history().iter().map(format_number).collect();
            format!("Last results: {}", numbers.join(" "))
        }
    };
    ctx.say(response).await?;
    Ok(())
}

/// Lists the players at the table
#[poise::command(slash_command, prefix_command)]
async fn table(ctx: Context<'_>) -> Result<()> {
    let window = ctx.data().config.active_window.as_millis() as u64;
    let response = {
        let table = ctx.data().table.read().await;
        let active = table.active_players(now_millis(), window);
        if active.is_empty() {
            "Nobody is at the table.".to_string()
        } else {
            let lines: Vec<String> = active
                .iter()
                .map(|player| {
                    let state = if player.spinning { "🎡" } else { "🟢" };
                    format!("{} {}: {} {}", state, player.username, player.balance, CURRENCY)
                })
                .collect();
            format!("{} players online\n{}", active.len(), lines.join("\n"))
        }
    };
    ctx.say(response).await?;
    Ok(())
}

/// Shows the prizes and the richest players
#[poise::command(slash_command, prefix_command)]
async fn prizes(ctx: Context<'_>) -> Result<()> {
    let response = {
        let table = ctx.data().table.read().await;
        let mut lines: Vec<String> = PRIZES
            .iter()
            .map(|prize| {
                format!(
                    "{} **{}**: {} {}\n{}",
                    prize.emoji, prize.name, prize.price, CURRENCY, prize.description
                )
            })
            .collect();
        if let Some(leader) = table.leaderboard().first() {
            lines.push(format!(
                "Top player: {} with {} {}",
                leader.username, leader.balance, CURRENCY
            ));
        }
        lines.join("\n")
    };
    ctx.say(response).await?;
    Ok(())
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, anyhow::Error>,
    _data: &Data,
) -> Result<()> {
    if let serenity::FullEvent::Ready { data_about_bot, .. } = event {
        info!("Logged in as {}", data_about_bot.user.name);
    }
    Ok(())
}

pub async fn start(config: Config) -> Result<()> {
    let token = config.token.clone();
    let intents = serenity::GatewayIntents::non_privileged();
    let data = Data::new(config).await?;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                join(),
                leave(),
                bet(),
                bets(),
                clear(),
                spin(),
                balance(),
                history(),
                table(),
                prizes(),
            ],
            on_error: |err| {
                Box::pin(async move {
                    if let poise::FrameworkError::Command { error, ctx, .. } = err {
                        error!("command {} failed: {:?}", ctx.command().name, error);
                        let _ = ctx.say("Something went wrong at the table.").await;
                    } else if let Err(why) = poise::builtins::on_error(err).await {
                        error!("error while handling error: {}", why);
                    }
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::Bet;
    use crate::resolver::resolve;

    #[test]
    fn test_areas_map_to_every_bet_type() {
        let areas = [
            Area::Red,
            Area::Black,
            Area::Green,
            Area::Even,
            Area::Odd,
            Area::Low,
            Area::High,
        ];
        let types: Vec<BetType> = areas.iter().map(|area| BetType::from(*area)).collect();
        assert_eq!(types, BetType::ALL.to_vec());
    }

    #[test]
    fn test_chips_are_table_chips() {
        let chips = [
            Chip::Ten,
            Chip::Fifty,
            Chip::Hundred,
            Chip::FiveHundred,
            Chip::Thousand,
        ];
        let values: Vec<u64> = chips.iter().map(|chip| chip.value()).collect();
        assert_eq!(values, crate::bet::CHIP_VALUES.to_vec());
    }

    #[test]
    fn test_format_round() {
        let bets = [
            Bet::new(BetType::Red, 100).unwrap(),
            Bet::new(BetType::Black, 50).unwrap(),
        ];
        let result = resolve(&bets, WinningNumber::new(1).unwrap());
        let text = format_round(&result, 1234);
        assert!(text.contains("**🔴 1**"));
        assert!(text.contains("✅ Red 100 → +200"));
        assert!(text.contains("❌ Black 50"));
        assert!(text.contains("You win 200"));
        assert!(text.contains("Balance: 1234"));
    }

    #[test]
    fn test_format_slip() {
        let mut slip = BetSlip::new();
        assert_eq!(format_slip(&slip), "No bets placed.");
        slip.stake(BetType::Green, 10);
        slip.stake(BetType::Green, 10);
        let text = format_slip(&slip);
        assert!(text.contains("Green (0): 20 (pays x36)"));
        assert!(text.contains("Total bet: 20"));
    }
}

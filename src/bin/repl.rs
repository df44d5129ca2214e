use dicemsg::entity::{Entities, PlainText};
use dicemsg::message::{Annotation, MemoryDirectory, Player};
use dicemsg::roll::DefaultRoller;
use dicemsg::systems::{CocCheck, LoopRoll, Modifier};
use dicemsg::{RollConfig, RpgMessage, Snapshot};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
:face N         set the default face
:coc[+|-] TEXT  Call of Cthulhu check, optionally with a bonus or penalty die
:loop N TEXT    roll N d6 and count sixes
:set NAME VALUE set a variable, used as $NAME
:say TEXT       resolve TEXT as a chat message and roll its dice
anything else   roll every dice expression in the line";

const CHAT: i64 = 1;
const USER: i64 = 1;
const PLAYER: i64 = 1;

struct Session {
    config: RollConfig,
    directory: MemoryDirectory,
}

impl Session {
    fn new() -> Self {
        let mut directory = MemoryDirectory::new();
        directory.add_player(
            CHAT,
            Player {
                id: PLAYER,
                user_id: USER,
                username: Some("player_one".to_owned()),
                character_name: "Player One".to_owned(),
                full_name: "Player One".to_owned(),
            },
        );
        Self {
            config: RollConfig::default(),
            directory,
        }
    }
}

fn print_entities(entities: &Entities) {
    println!("{}", entities.render());
    println!("{}", entities.render_with(&PlainText));
}

fn eval_line(session: &mut Session, line: &str) -> dicemsg::Result<()> {
    let mut roller = DefaultRoller::default();
    let config = &mut session.config;
    if let Some(rest) = line.strip_prefix(":face") {
        match rest.trim().parse() {
            Ok(face) => {
                *config = config.with_face(face);
                println!("default face: {}", config.default_face);
            }
            Err(_) => println!("usage: :face N"),
        }
    } else if let Some(rest) = line.strip_prefix(":set") {
        match rest.trim().split_once(' ') {
            Some((name, value)) => session.directory.set_variable(PLAYER, name, value.trim()),
            None => println!("usage: :set NAME VALUE"),
        }
    } else if let Some(text) = line.strip_prefix(":say ") {
        let snapshot = Snapshot::take(&session.directory, CHAT, USER)?;
        let mut msg = RpgMessage::resolve(snapshot, text, &Annotation::scan(text), 0);
        msg.evaluate_rolls(config.default_face, &mut roller)?;
        msg.ensure_content(false)?;
        print_entities(msg.entities());
        if !msg.tags().is_empty() {
            println!("tags: {}", msg.tags().join(", "));
        }
    } else if let Some(rest) = line.strip_prefix(":coc") {
        let modifier = rest.chars().next().and_then(Modifier::from_sign);
        let text = if modifier.is_some() { &rest[1..] } else { rest };
        let outcome = CocCheck::parse(text, modifier)?.roll(&mut roller);
        print_entities(&Entities::from(vec![outcome.to_entity()]));
    } else if let Some(rest) = line.strip_prefix(":loop") {
        let outcome = LoopRoll::parse(rest)?.roll(&mut roller);
        print_entities(&outcome.to_entities());
    } else if line.trim() == ":help" {
        println!("{}", HELP);
    } else {
        let rolled = dicemsg::roll_with(line, config.default_face, &mut roller)?;
        print_entities(&rolled.to_entities());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        if let Err(why) = eval_line(&mut session, &line) {
            eprintln!("Error [{}]: {}", why.code(), why);
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}

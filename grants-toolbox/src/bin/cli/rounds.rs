use super::{Error, Fixtures};
use grants_toolbox::rounds::create_grant_rounds;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Rounds {
    #[structopt(flatten)]
    fixtures: Fixtures,
}

impl Rounds {
    pub fn exec(self) -> Result<(), Error> {
        let (active, closed) = self.fixtures.load()?;
        for round in create_grant_rounds(&active, &closed) {
            println!("{}", round.name);
            for election in &round.elections {
                println!(
                    "  {} ({})",
                    election.id,
                    if election.active { "active" } else { "closed" },
                );
            }
        }
        Ok(())
    }
}

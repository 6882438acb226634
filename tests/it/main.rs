mod ledger;
mod pipeline;

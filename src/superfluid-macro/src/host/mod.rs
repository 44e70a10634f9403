pub mod onchain;

pub mod proposal_writer;

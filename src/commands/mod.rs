pub mod demultiplex;

pub mod answer;
pub mod embeddings;
pub mod pinecone;
pub mod rag;
pub mod vector_database;

pub(crate) mod mock_llm;

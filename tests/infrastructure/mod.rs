mod openai_adapters_test;

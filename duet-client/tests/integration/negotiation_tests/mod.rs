mod test_offer_answer_connects;

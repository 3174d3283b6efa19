use yew::prelude::*;

use shared::{CheckoutCreated, PaymentCurrency};

use crate::app::api::BackendApi;
use crate::app::util::{
    get_value_from_event, get_value_from_input_event, page_location, submit_gateway_form,
};

mod api;
mod util;

#[derive(PartialEq)]
enum Page {
    Checkout,
    Success(Option<String>),
    Cancelled(Option<String>),
}

pub enum CheckoutMsg {
    UpdateOrderNumber(String),
    UpdateAmount(String),
    UpdateCurrency(String),
    TryCheckout,
    CheckoutReady(anyhow::Result<CheckoutCreated>),
}

pub struct App {
    page: Page,
    order_number: String,
    amount: String,
    currency: PaymentCurrency,
    warn_message: Option<String>,
    redirecting: bool,
}

impl Component for App {
    type Message = CheckoutMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let (path, order_id) = page_location();

        let page = if path.ends_with("/checkout/success") {
            Page::Success(order_id)
        } else if path.ends_with("/checkout/cancel") {
            Page::Cancelled(order_id)
        } else {
            Page::Checkout
        };

        Self {
            page,
            order_number: "".to_string(),
            amount: "100.00".to_string(),
            currency: PaymentCurrency::DKK,
            warn_message: None,
            redirecting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CheckoutMsg::UpdateOrderNumber(v) => self.order_number = v,
            CheckoutMsg::UpdateAmount(v) => self.amount = v,
            CheckoutMsg::UpdateCurrency(v) => {
                if v == "DKK" {
                    self.currency = PaymentCurrency::DKK;
                } else if v == "EUR" {
                    self.currency = PaymentCurrency::EUR;
                } else if v == "USD" {
                    self.currency = PaymentCurrency::USD;
                }
            }
            CheckoutMsg::TryCheckout => {
                let mut is_ok = true;

                if self.amount == "" {
                    self.warn_message = Some("Enter an amount!".to_string());
                    is_ok = false;
                }

                if self.order_number == "" {
                    self.warn_message = Some("Enter an order number!".to_string());
                    is_ok = false;
                }

                if is_ok {
                    self.warn_message = None;
                    self.redirecting = true;

                    let order_number = self.order_number.clone();
                    let amount = self.amount.clone();
                    let currency = self.currency;

                    ctx.link().send_future(async move {
                        CheckoutMsg::CheckoutReady(
                            BackendApi::create_checkout(order_number, amount, currency).await,
                        )
                    });
                }
            }
            CheckoutMsg::CheckoutReady(Ok(checkout)) => {
                if let Err(err) = submit_gateway_form(&checkout.checkout_url, &checkout.form_data) {
                    gloo_console::error!(format!("Gateway redirect failed: {err:?}"));

                    self.warn_message = Some("Failed to open the payment page".to_string());
                    self.redirecting = false;
                }
            }
            CheckoutMsg::CheckoutReady(Err(err)) => {
                self.warn_message = Some(err.to_string());
                self.redirecting = false;
            }
        };
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.page {
            Page::Checkout => self.view_checkout_form(ctx),
            Page::Success(order_id) => view_result(
                "Payment successful!",
                "Your payment has been processed.",
                order_id,
            ),
            Page::Cancelled(order_id) => view_result(
                "Payment cancelled",
                "You have cancelled the payment. You can try again from the checkout page.",
                order_id,
            ),
        }
    }
}

impl App {
    fn view_checkout_form(&self, ctx: &Context<Self>) -> Html {
        let on_order_change = ctx.link().callback(CheckoutMsg::UpdateOrderNumber);
        let on_order_input = Callback::from(move |input_event: InputEvent| {
            on_order_change.emit(get_value_from_input_event(input_event));
        });

        let on_amount_change = ctx.link().callback(CheckoutMsg::UpdateAmount);
        let on_amount_input = Callback::from(move |input_event: InputEvent| {
            on_amount_change.emit(get_value_from_input_event(input_event));
        });

        let on_currency_change = ctx.link().callback(CheckoutMsg::UpdateCurrency);
        let on_currency_input = Callback::from(move |event: Event| {
            on_currency_change.emit(get_value_from_event(event));
        });

        html! {
            <div class="card_a">
                <div class="card_b">
                    <div class="card_hdr">
                        <b>{ "Checkout" }</b>
                    </div>
                    <div class="row_a">
                        <div class="row_lbl">
                            { "Order number:" }
                        </div>
                        <div class="row_c">
                            <input placeholder="e.g. ORD-12345" type="text" id="order_number" class="row_i" oninput={on_order_input} value={self.order_number.clone()}/>
                        </div>
                    </div>
                    <div class="row_a">
                        <div class="row_lbl">
                            { "Amount:" }
                        </div>
                        <div class="row_c">
                            <input placeholder="100.00" type="text" id="amount" class="row_i" oninput={on_amount_input} value={self.amount.clone()}/>
                        </div>
                    </div>
                    <div class="row_a">
                        <div class="row_lbl">
                            { "Currency:" }
                        </div>
                        <div class="row_slct">
                            <select id="currency" onchange={on_currency_input}>
                                <option value="DKK" selected={self.currency == PaymentCurrency::DKK}>{ "DKK" }</option>
                                <option value="EUR" selected={self.currency == PaymentCurrency::EUR}>{ "EUR" }</option>
                                <option value="USD" selected={self.currency == PaymentCurrency::USD}>{ "USD" }</option>
                            </select>
                        </div>
                    </div>
                    <div class="card_f">
                        <button disabled={self.redirecting} onclick={ctx.link().callback(|_| CheckoutMsg::TryCheckout)}>
                            {
                                if self.redirecting {
                                    "Redirecting..."
                                } else {
                                    "Pay with ViaBill"
                                }
                            }
                        </button>
                    </div>
                    <div class="card_f2">
                        {
                            if let Some(warn) = &self.warn_message {
                                html!{ <div class="card_warn">{ warn }</div> }
                            } else {
                                html!{}
                            }
                        }
                    </div>
                </div>
            </div>
        }
    }
}

fn view_result(title: &str, message: &str, order_id: &Option<String>) -> Html {
    html! {
        <div class="card_a">
            <div class="card_b">
                <div class="card_hdr">
                    <b>{ title }</b>
                </div>
                <p>{ message }</p>
                {
                    if let Some(order_id) = order_id {
                        html!{ <p class="order_id">{ format!("Order: {order_id}") }</p> }
                    } else {
                        html!{}
                    }
                }
                <a href="/">{ "New checkout" }</a>
            </div>
        </div>
    }
}

// dashchat Engine: Web Chat HTML Template
//
// Self-contained HTML/CSS/JS chat page served by the webchat bridge, plus the
// two avatar images it references. Bubbles arrive pre-rendered from the
// server; errors arrive as plain text and are inserted with textContent.

use dashchat_core::theme::THEME_STORAGE_KEY;
use dashchat_core::{Role, Theme};

/// Avatar image for `role`, served at `role.avatar_src()`.
pub fn avatar_svg(role: Role) -> &'static str {
    match role {
        Role::User => USER_AVATAR_SVG,
        Role::Bot => BOT_AVATAR_SVG,
    }
}

const USER_AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="36" height="36" viewBox="0 0 36 36"><circle cx="18" cy="18" r="18" fill="#4a90d9"/><circle cx="18" cy="14" r="6" fill="#fff"/><path d="M7 30c2-6 7-9 11-9s9 3 11 9" fill="#fff"/></svg>"##;

const BOT_AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="36" height="36" viewBox="0 0 36 36"><circle cx="18" cy="18" r="18" fill="#7b5cd6"/><rect x="9" y="11" width="18" height="14" rx="4" fill="#fff"/><circle cx="14" cy="18" r="2" fill="#7b5cd6"/><circle cx="22" cy="18" r="2" fill="#7b5cd6"/><rect x="17" y="6" width="2" height="5" fill="#fff"/></svg>"##;

/// Build the complete HTML page for the chat interface.
pub fn build_chat_html(title: &str, theme: Theme) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f2f3f5;color:#222;height:100vh;display:flex;justify-content:center}}
body.dark-mode{{background:#1e1e1e;color:#ccc}}
.chat-container{{width:100%;max-width:820px;height:100vh;display:flex;flex-direction:column;background:#fff}}
.chat-container.dark-mode{{background:#252526}}
.header{{padding:14px 20px;border-bottom:1px solid #ddd;display:flex;align-items:center;gap:12px}}
.header h1{{flex:1;font-size:16px;font-weight:600}}
.header .dot{{width:8px;height:8px;border-radius:50%;background:#bbb;transition:background .3s}}
.header .dot.online{{background:#2ecc71}}
.dropdown{{position:relative}}
.dropdown button{{padding:6px 10px;border:1px solid #ccc;border-radius:6px;background:transparent;color:inherit;cursor:pointer}}
.dropdown-content{{display:none;position:absolute;right:0;top:36px;min-width:160px;background:#fff;border:1px solid #ddd;border-radius:6px;box-shadow:0 4px 12px rgba(0,0,0,.15);z-index:10}}
.dropdown-content.show{{display:block}}
.dropdown-content a{{display:block;padding:8px 14px;color:#222;text-decoration:none;font-size:14px}}
.dropdown-content a:hover{{background:#f0f0f0}}
.messages{{flex:1;overflow-y:auto;padding:20px;display:flex;flex-direction:column;gap:12px}}
.messages.dark-mode{{background:#1e1e1e}}
.message{{display:flex;gap:10px;align-items:flex-start;max-width:85%}}
.message img{{width:36px;height:36px;border-radius:50%;flex-shrink:0}}
.message.user{{align-self:flex-end;flex-direction:row-reverse}}
.message.bot{{align-self:flex-start}}
.message-content{{padding:10px 14px;border-radius:12px;font-size:14px;line-height:1.5;word-wrap:break-word;background:#e9eef6}}
.message.user .message-content{{background:#4a90d9;color:#fff;white-space:pre-wrap}}
.dark-mode .message.bot .message-content{{background:#2d2d30;color:#ddd}}
.message.error .message-content{{background:#fdecea;color:#b3261e}}
.message-content p{{margin:4px 0}}
.bold-text{{font-weight:700}}
.section-title{{font-weight:700;font-size:15px;margin-top:8px}}
.subsection{{margin-left:8px}}
.subtitle{{font-weight:600;color:#4a4a8a}}
.dark-mode .subtitle{{color:#b4a7ff}}
.notice{{align-self:center;color:#888;font-size:12px;font-style:italic}}
#loading{{display:none;align-self:flex-start;color:#888;font-size:13px;padding:4px 14px}}
#loading::after{{content:'...';animation:dots 1.2s infinite}}
@keyframes dots{{0%,20%{{content:'.'}}40%{{content:'..'}}60%,100%{{content:'...'}}}}
.input-bar{{padding:14px 20px;border-top:1px solid #ddd;display:flex;gap:8px}}
.input-bar textarea{{flex:1;padding:10px 14px;border:1px solid #ccc;border-radius:8px;background:transparent;color:inherit;font-size:14px;font-family:inherit;resize:none;outline:none;max-height:120px}}
.input-bar button{{padding:10px 20px;background:#4a90d9;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer;white-space:nowrap}}
.input-bar button:disabled{{opacity:.4;cursor:not-allowed}}
</style>
</head>
<body class="{theme_class}">
<div class="chat-container {theme_class}">
  <div class="header">
    <div class="dot" id="dot"></div>
    <h1>{title}</h1>
    <div class="dropdown">
      <button onclick="toggleDropdown(event)">&#9776;</button>
      <div class="dropdown-content" id="dropdownMenu">
        <a href="#" onclick="toggleTheme();return false">Toggle theme</a>
        <a href="#" onclick="clearMessages();return false">Clear messages</a>
      </div>
    </div>
  </div>
  <div class="messages {theme_class}" id="messages">
    <div id="loading">Thinking</div>
  </div>
  <div class="input-bar">
    <textarea id="chat-input" placeholder="Type a message..." rows="1"></textarea>
    <button id="sendBtn" onclick="sendMessage()">Send</button>
  </div>
</div>
<script>
const STORAGE_KEY="{storage_key}";
const msgs=document.getElementById("messages");
const loading=document.getElementById("loading");
const inp=document.getElementById("chat-input");
const sendBtn=document.getElementById("sendBtn");
const dot=document.getElementById("dot");
let ws=null,pending=false;

function connect(){{
  const proto=location.protocol==="https:"?"wss:":"ws:";
  ws=new WebSocket(proto+"//"+location.host+"/ws");
  ws.onopen=()=>{{dot.classList.add("online");inp.focus()}};
  ws.onclose=()=>{{dot.classList.remove("online");setPending(false);addNotice("Disconnected.")}};
  ws.onmessage=(e)=>{{
    let d;
    try{{d=JSON.parse(e.data)}}catch(err){{return}}
    if(d.type==="typing"){{showLoading(true);return}}
    if(d.type==="system"){{addNotice(d.text||"");return}}
    if(d.type==="error"){{showLoading(false);addError(d.text||"");setPending(false);return}}
    if(d.type==="message"){{
      addHtml(d.html||"");
      if(d.role==="bot"){{showLoading(false);setPending(false)}}
    }}
  }};
}}

function sendMessage(){{
  const message=inp.value;
  if(!message.trim())return;
  if(pending||!ws||ws.readyState!==1)return;
  ws.send(JSON.stringify({{type:"message",text:message}}));
  inp.value="";
  inp.style.height="auto";
  setPending(true);
}}

function setPending(p){{pending=p;sendBtn.disabled=p}}

function showLoading(on){{
  loading.style.display=on?"block":"none";
  if(on){{msgs.appendChild(loading);scrollDown()}}
}}

function addHtml(html){{
  msgs.insertBefore(document.createRange().createContextualFragment(html),loading);
  scrollDown();
}}

function addError(text){{
  const wrap=document.createElement("div");
  wrap.className="message bot error";
  const img=document.createElement("img");
  img.src="/avatar/bot.svg";img.alt="Bot";
  const content=document.createElement("div");
  content.className="message-content";
  content.textContent=text;
  wrap.appendChild(img);wrap.appendChild(content);
  msgs.insertBefore(wrap,loading);
  scrollDown();
}}

function addNotice(text){{
  const d=document.createElement("div");
  d.className="notice";
  d.textContent=text;
  msgs.insertBefore(d,loading);
  scrollDown();
}}

function scrollDown(){{
  const last=loading.previousElementSibling;
  if(last&&last.scrollIntoView){{last.scrollIntoView({{behavior:"smooth"}})}}
}}

function clearMessages(){{
  Array.from(msgs.children).forEach(c=>{{if(c!==loading)c.remove()}});
}}

function applyTheme(dark){{
  document.body.classList.toggle("dark-mode",dark);
  document.querySelector(".chat-container").classList.toggle("dark-mode",dark);
  msgs.classList.toggle("dark-mode",dark);
}}

function toggleTheme(){{
  const dark=!document.body.classList.contains("dark-mode");
  applyTheme(dark);
  localStorage.setItem(STORAGE_KEY,dark);
}}

function toggleDropdown(event){{
  event.preventDefault();
  document.getElementById("dropdownMenu").classList.toggle("show");
}}

window.onclick=function(event){{
  if(!event.target.matches(".dropdown button")){{
    for(const d of document.getElementsByClassName("dropdown-content")){{d.classList.remove("show")}}
  }}
}};

document.addEventListener("DOMContentLoaded",()=>{{
  const saved=localStorage.getItem(STORAGE_KEY);
  if(saved==="true")applyTheme(true);
  else if(saved==="false")applyTheme(false);
}});

inp.addEventListener("keydown",(e)=>{{
  if(e.key==="Enter"&&!e.shiftKey){{e.preventDefault();sendMessage()}}
}});
inp.addEventListener("input",()=>{{
  inp.style.height="auto";
  inp.style.height=Math.min(inp.scrollHeight,120)+"px";
}});

connect();
</script>
</body>
</html>"##,
        title = title,
        theme_class = theme.body_class(),
        storage_key = THEME_STORAGE_KEY,
    )
}
